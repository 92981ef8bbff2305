//! DQN algorithm hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the DQN (Deep Q-Network) algorithm
///
/// This struct contains all hyperparameters used by the DQN training loop.
/// Defaults match the values the agent was tuned with for the Snake
/// environment.
///
/// # Example
///
/// ```rust
/// use snake_dqn::rl::DqnConfig;
///
/// // Use default hyperparameters
/// let config = DqnConfig::default();
///
/// // Or customize specific parameters
/// let config = DqnConfig {
///     learning_rate: 5e-4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqnConfig {
    /// Learning rate for the Adam optimizer
    ///
    /// Default: 1e-3
    pub learning_rate: f64,

    /// Discount factor for future rewards (gamma)
    ///
    /// Determines how much future rewards are valued relative to immediate rewards.
    /// Values closer to 1.0 make the agent more far-sighted.
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Initial exploration rate
    ///
    /// Probability of choosing a random action at the start of training.
    ///
    /// Default: 1.0
    pub epsilon_start: f32,

    /// Minimum exploration rate
    ///
    /// Epsilon never decays below this floor.
    ///
    /// Default: 0.01
    pub epsilon_min: f32,

    /// Multiplicative epsilon decay applied after each episode
    ///
    /// Default: 0.995
    pub epsilon_decay: f32,

    /// Minibatch size sampled from the replay buffer per training step
    ///
    /// Training is skipped until the buffer holds at least this many
    /// transitions.
    ///
    /// Default: 1024
    pub batch_size: usize,

    /// Maximum number of transitions kept in the replay buffer
    ///
    /// Default: 100_000
    pub replay_capacity: usize,
}

impl DqnConfig {
    /// Create a new configuration with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// Checks that all hyperparameters are in valid ranges.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    ///
    /// # Example
    ///
    /// ```rust
    /// use snake_dqn::rl::DqnConfig;
    ///
    /// let mut config = DqnConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.learning_rate = -0.1;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if !(0.0..=1.0).contains(&self.epsilon_start) {
            return Err(format!(
                "epsilon_start must be in [0, 1], got {}",
                self.epsilon_start
            ));
        }

        if !(0.0..=1.0).contains(&self.epsilon_min) {
            return Err(format!(
                "epsilon_min must be in [0, 1], got {}",
                self.epsilon_min
            ));
        }

        if self.epsilon_min > self.epsilon_start {
            return Err(format!(
                "epsilon_min ({}) cannot exceed epsilon_start ({})",
                self.epsilon_min, self.epsilon_start
            ));
        }

        if self.epsilon_decay <= 0.0 || self.epsilon_decay > 1.0 {
            return Err(format!(
                "epsilon_decay must be in (0, 1], got {}",
                self.epsilon_decay
            ));
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.replay_capacity == 0 {
            return Err("replay_capacity must be at least 1".to_string());
        }

        if self.batch_size > self.replay_capacity {
            return Err(format!(
                "batch_size ({}) cannot exceed replay_capacity ({})",
                self.batch_size, self.replay_capacity
            ));
        }

        Ok(())
    }
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            gamma: 0.9,
            epsilon_start: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            batch_size: 1024,
            replay_capacity: 100_000,
        }
    }
}
