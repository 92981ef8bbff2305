use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::Rng;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: rand::thread_rng(),
        }
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let mut foods = Vec::with_capacity(self.config.food_count);
        for _ in 0..self.config.food_count {
            if let Some(food) = self.spawn_food(&snake, &foods) {
                foods.push(food);
            }
        }

        GameState::new(snake, foods, self.config.grid_width, self.config.grid_height)
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult {
                reward: 0.0,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                },
            };
        }

        // Update direction based on action (prevent 180-degree turns)
        match action {
            Action::Move(new_direction) => {
                if !state.snake.direction.is_opposite(new_direction) {
                    state.snake.direction = new_direction;
                }
            }
            Action::Continue => {
                // Keep current direction
            }
        }

        // Calculate new head position
        let new_head = state.snake.head().moved_in_direction(state.snake.direction);
        let ate_food = state.foods.contains(&new_head);

        // Check for collisions. Eating grows the snake, so the tail cell only
        // vacates on non-growing steps.
        if let Some(collision_type) = self.check_collision(state, new_head, ate_food) {
            state.is_alive = false;
            state.steps += 1;

            return StepResult {
                reward: self.config.death_penalty,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        // Move snake (grow if ate food)
        state.snake.move_snake(ate_food);

        let mut reward = if ate_food {
            state.score += 1;
            state.foods.retain(|&food| food != new_head);
            if let Some(food) = self.spawn_food(&state.snake, &state.foods) {
                state.foods.push(food);
            }
            self.config.food_reward
        } else {
            self.config.step_penalty
        };

        if state.is_head_trapped() {
            reward += self.config.trapped_penalty;
        }

        state.steps += 1;

        StepResult {
            reward,
            terminated: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(
        &self,
        state: &GameState,
        pos: Position,
        growing: bool,
    ) -> Option<CollisionType> {
        // Check wall collision
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // Check self-collision
        if state.snake.would_collide(pos, growing) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food at a random cell not occupied by the snake or another food.
    ///
    /// Returns None when the board has no free cell left.
    fn spawn_food(&mut self, snake: &Snake, foods: &[Position]) -> Option<Position> {
        let total_cells = self.config.grid_width * self.config.grid_height;
        if snake.len() + foods.len() >= total_cells {
            return None;
        }

        loop {
            let x = self.rng.gen_range(0..self.config.grid_width) as i32;
            let y = self.rng.gen_range(0..self.config.grid_height) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) && !foods.contains(&pos) {
                return Some(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::new(GameConfig::default());
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.foods.len(), 2);
        assert_eq!(state.snake.head(), Position::new(15, 11));
    }

    #[test]
    fn test_food_never_spawns_on_snake() {
        let mut engine = GameEngine::new(GameConfig::small());

        for _ in 0..50 {
            let state = engine.reset();
            for &food in &state.foods {
                assert!(!state.snake.occupies(food));
            }
        }
    }

    #[test]
    fn test_food_positions_are_distinct() {
        let mut engine = GameEngine::new(GameConfig::small());

        for _ in 0..50 {
            let state = engine.reset();
            assert_ne!(state.foods[0], state.foods[1]);
        }
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        // Keep the step clear of food so only the step penalty applies
        state.foods = vec![Position::new(0, 0)];
        let initial_head = state.snake.head();

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(state.steps, 1);
        assert_ne!(state.snake.head(), initial_head);
        assert!((result.reward - (-0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();

        // Place food directly in front of snake
        let head = state.snake.head();
        state.foods = vec![head.moved_in_direction(state.snake.direction)];
        let initial_length = state.snake.len();

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.info.ate_food);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert!((result.reward - 10.0).abs() < 1e-6);
        // Eaten food is replaced
        assert_eq!(state.foods.len(), 1);
        assert_ne!(state.foods[0], state.snake.head());
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 3),
            vec![Position::new(5, 5)],
            10,
            10,
        );

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert!(!state.is_alive);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert!((result.reward - (-10.0)).abs() < 1e-6);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = GameEngine::new(GameConfig::small());

        // Snake at (5, 5) going Right with length 5
        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut state = GameState::new(snake, vec![Position::new(8, 8)], 10, 10);

        // Right: head (6,5). Down: head (6,6). Left: head (5,6).
        engine.step(&mut state, Action::Continue);
        engine.step(&mut state, Action::Move(Direction::Down));
        engine.step(&mut state, Action::Move(Direction::Left));
        // Up: head would land on (5,5), still occupied by the body
        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_moving_into_vacating_tail_is_legal() {
        let mut engine = GameEngine::new(GameConfig::small());

        // 2x2 loop: head (5,5), (4,5), (4,6), tail (5,6); heading Down means
        // the next cell is the tail's, which vacates this same tick
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(4, 5),
                Position::new(4, 6),
                Position::new(5, 6),
            ],
            direction: Direction::Down,
        };
        let mut state = GameState::new(snake, vec![Position::new(8, 8)], 10, 10);

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(5, 6));
    }

    #[test]
    fn test_trapped_penalty() {
        let mut engine = GameEngine::new(GameConfig::small());

        // Snake curls so that after moving Left into the corner column the
        // head has walls above/left and body right/below
        let snake = Snake {
            body: vec![
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(0, 1),
                Position::new(0, 2),
            ],
            direction: Direction::Left,
        };
        let mut state = GameState::new(snake, vec![Position::new(8, 8)], 10, 10);

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(0, 0));
        // step penalty plus trapped penalty
        assert!((result.reward - (-0.3)).abs() < 1e-6);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        state.snake.direction = Direction::Right;

        // Try to turn 180 degrees (should be ignored)
        engine.step(&mut state, Action::Move(Direction::Left));

        assert_eq!(state.snake.direction, Direction::Right);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        state.is_alive = false;
        let steps_before = state.steps;

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert_eq!(result.reward, 0.0);
        assert_eq!(state.steps, steps_before); // Should not increment
    }
}
