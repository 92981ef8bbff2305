//! Training mode for the DQN agent
//!
//! This module implements the training loop. It runs episodes in the Snake
//! environment, stores every transition in the replay memory, trains on a
//! random minibatch after each step, decays epsilon after each episode, and
//! periodically saves checkpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use snake_dqn::modes::{TrainMode, TrainConfig};
//! use snake_dqn::rl::{default_device, TrainingBackend};
//! use std::path::PathBuf;
//!
//! let config = TrainConfig::new(1000, PathBuf::from("models/snake.bin"));
//! let device = default_device();
//! let mut train_mode = TrainMode::<TrainingBackend>::new(config, device);
//! train_mode.run()?;
//! ```

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use std::path::{Path, PathBuf};

use crate::game::GameConfig;
use crate::metrics::TrainingStats;
use crate::rl::{DqnAgent, DqnConfig, QNetworkConfig, SnakeEnvironment, save_model};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Path to save the final trained model
    pub save_path: PathBuf,

    /// Save a checkpoint every N episodes
    pub checkpoint_frequency: usize,

    /// Log training progress every N episodes
    pub log_frequency: usize,

    /// Step cap per episode; an episode that reaches it is truncated
    pub max_episode_steps: usize,

    /// Game configuration (grid size, rewards)
    pub game_config: GameConfig,

    /// DQN hyperparameters
    pub dqn_config: DqnConfig,
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    ///
    /// # Arguments
    ///
    /// * `num_episodes` - Number of episodes to train
    /// * `save_path` - Path to save the final model
    pub fn new(num_episodes: usize, save_path: PathBuf) -> Self {
        Self {
            num_episodes,
            save_path,
            checkpoint_frequency: 200,
            log_frequency: 10,
            max_episode_steps: 1000,
            game_config: GameConfig::default(),
            dqn_config: DqnConfig::default(),
        }
    }
}

/// Training mode for the DQN agent
///
/// Runs the training loop, storing experiences and updating the agent after
/// every environment step. Periodically logs progress and saves checkpoints.
pub struct TrainMode<B: AutodiffBackend> {
    /// DQN agent being trained
    agent: DqnAgent<B>,

    /// Snake environment for experience collection
    env: SnakeEnvironment,

    /// Training statistics tracker
    stats: TrainingStats,

    /// Training configuration
    config: TrainConfig,

    /// Current episode number
    current_episode: usize,
}

impl<B: AutodiffBackend> TrainMode<B> {
    /// Create a new training mode
    ///
    /// # Arguments
    ///
    /// * `config` - Training configuration
    /// * `device` - Device for computation
    pub fn new(config: TrainConfig, device: B::Device) -> Self {
        let network = QNetworkConfig::new().init::<B>(&device);
        let agent = DqnAgent::new(network, config.dqn_config.clone(), device);
        let env = SnakeEnvironment::new(config.game_config.clone());

        // 100-episode rolling window for the summary lines
        let stats = TrainingStats::new(100);

        Self {
            agent,
            env,
            stats,
            config,
            current_episode: 0,
        }
    }

    /// Run the training loop
    ///
    /// Trains the agent for the specified number of episodes, logging progress
    /// and saving checkpoints periodically.
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        for episode in 0..self.config.num_episodes {
            self.current_episode = episode;

            // Run one episode
            let (episode_reward, episode_steps, episode_score) = self.run_episode();

            // Record episode stats and decay exploration
            self.stats
                .record_episode(episode_reward, episode_steps, episode_score);
            self.agent.finish_episode();

            // Log progress
            if (episode + 1) % self.config.log_frequency == 0 {
                self.print_progress(episode + 1);
            }

            // Save checkpoint
            if (episode + 1) % self.config.checkpoint_frequency == 0 {
                self.save_checkpoint()?;
            }
        }

        // Final save
        self.save_model()?;

        println!("\nTraining complete!");
        println!("Final model saved to: {:?}", self.config.save_path);
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());

        Ok(())
    }

    /// Run a single training episode
    ///
    /// Steps the environment with the epsilon-greedy policy, stores every
    /// transition, and trains on a replay minibatch after each step. Episodes
    /// that reach the step cap are truncated; their final transition keeps
    /// `done = false` so the target still bootstraps from the next state.
    ///
    /// # Returns
    ///
    /// A tuple containing:
    /// - Total episode reward
    /// - Number of steps in the episode
    /// - Final score (food eaten)
    fn run_episode(&mut self) -> (f32, usize, u32) {
        let mut obs = self.env.reset();
        let mut episode_reward = 0.0;
        let mut episode_steps = 0;

        loop {
            let action = self.agent.select_action(&obs);
            let (next_obs, reward, done) = self.env.step(action);

            self.agent.remember(obs, action, reward, next_obs, done);

            if let Some(loss) = self.agent.replay() {
                self.stats.record_loss(loss);
            }

            episode_reward += reward;
            episode_steps += 1;
            obs = next_obs;

            if done || episode_steps >= self.config.max_episode_steps {
                break;
            }
        }

        (episode_reward, episode_steps, self.env.state().score)
    }

    /// Save a checkpoint of the current model
    fn save_checkpoint(&self) -> Result<()> {
        let checkpoint_path = self
            .config
            .save_path
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("checkpoint_ep{}.bin", self.current_episode + 1));

        save_model(&self.agent, &checkpoint_path)
            .with_context(|| format!("Failed to save checkpoint to {:?}", checkpoint_path))?;

        println!("  Checkpoint saved: {:?}", checkpoint_path);

        Ok(())
    }

    /// Save the final trained model
    fn save_model(&self) -> Result<()> {
        save_model(&self.agent, &self.config.save_path).with_context(|| {
            format!("Failed to save final model to {:?}", self.config.save_path)
        })?;

        Ok(())
    }

    /// Print training header information
    fn print_header(&self) {
        println!("{}", "=".repeat(70));
        println!("DQN Training - Snake");
        println!("{}", "=".repeat(70));
        println!("Episodes: {}", self.config.num_episodes);
        println!(
            "Game Config: {}x{} grid, {} food",
            self.config.game_config.grid_width,
            self.config.game_config.grid_height,
            self.config.game_config.food_count
        );
        println!("DQN Config:");
        println!("  Learning rate: {}", self.config.dqn_config.learning_rate);
        println!("  Gamma: {}", self.config.dqn_config.gamma);
        println!(
            "  Epsilon: {} -> {} (decay {})",
            self.config.dqn_config.epsilon_start,
            self.config.dqn_config.epsilon_min,
            self.config.dqn_config.epsilon_decay
        );
        println!("  Batch size: {}", self.config.dqn_config.batch_size);
        println!(
            "  Replay capacity: {}",
            self.config.dqn_config.replay_capacity
        );
        println!("Max steps per episode: {}", self.config.max_episode_steps);
        println!(
            "Checkpoints: Every {} episodes",
            self.config.checkpoint_frequency
        );
        println!("Logging: Every {} episodes", self.config.log_frequency);
        println!("Save path: {:?}", self.config.save_path);
        println!("{}", "=".repeat(70));
        println!();
    }

    /// Print training progress
    fn print_progress(&self, episode: usize) {
        println!(
            "[Episode {}/{}] {} | Eps: {:.3}",
            episode,
            self.config.num_episodes,
            self.stats.format_summary(),
            self.agent.epsilon(),
        );
    }
}
