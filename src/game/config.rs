use serde::{Deserialize, Serialize};

/// Configuration for the game
///
/// The default 30x22 grid corresponds to the classic 600x440 playfield at
/// 20 units per cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Number of food items kept on the board simultaneously
    pub food_count: usize,

    // Rewards (for RL)
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for each step (encourages efficiency)
    pub step_penalty: f32,
    /// Penalty for dying
    pub death_penalty: f32,
    /// Extra penalty when every cell around the head is blocked
    pub trapped_penalty: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 22,
            initial_snake_length: 1,
            food_count: 2,
            food_reward: 10.0,
            step_penalty: -0.1,
            death_penalty: -10.0,
            trapped_penalty: -0.2,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }
}
