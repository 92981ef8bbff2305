use super::observation::{encode_state, StateVector};
use crate::game::{Action, GameConfig, GameEngine, GameState};

/// Snake environment for reinforcement learning
///
/// Wraps the game engine and exposes the agent-facing interface:
/// - compact 11-feature state vectors as observations
/// - a discrete action space of 3 relative moves
/// - standard RL interface (reset, step)
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create a new Snake environment
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();
        Self { engine, state }
    }

    /// Reset the environment and return the initial observation
    pub fn reset(&mut self) -> StateVector {
        self.state = self.engine.reset();
        encode_state(&self.state)
    }

    /// Step the environment with a discrete action
    ///
    /// Actions are relative to the snake's heading:
    /// - 0: keep going straight
    /// - 1: turn clockwise
    /// - 2: turn counter-clockwise
    ///
    /// Returns: (observation, reward, done)
    pub fn step(&mut self, action_idx: usize) -> (StateVector, f32, bool) {
        let action = self.action_from_index(action_idx);
        let step_result = self.engine.step(&mut self.state, action);

        let observation = encode_state(&self.state);
        (observation, step_result.reward, step_result.terminated)
    }

    /// Get current observation without stepping
    pub fn observation(&self) -> StateVector {
        encode_state(&self.state)
    }

    /// Get reference to current game state (for rendering/testing)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Translate a relative action index into an absolute game action
    ///
    /// Indices outside the action space fall back to going straight.
    fn action_from_index(&self, idx: usize) -> Action {
        let heading = self.state.snake.direction;
        match idx {
            1 => Action::Move(heading.clockwise()),
            2 => Action::Move(heading.counter_clockwise()),
            _ => Action::Continue,
        }
    }
}
