//! Reinforcement learning for the Snake game
//!
//! Provides:
//! - 11-feature binary state vectors
//! - A 3-action relative-move environment over the game engine
//! - Bounded replay memory with uniform minibatch sampling
//! - Fully connected Q-network and the DQN training update
//! - Model persistence (weights + metadata)

pub mod backend;
pub mod buffer;
pub mod config;
pub mod dqn;
pub mod environment;
pub mod network;
pub mod observation;
pub mod persistence;

pub use backend::{InferenceBackend, TrainingBackend, default_device};
pub use buffer::{Experience, ReplayBuffer};
pub use config::DqnConfig;
pub use dqn::DqnAgent;
pub use environment::SnakeEnvironment;
pub use network::{QNetwork, QNetworkConfig};
pub use observation::{NUM_ACTIONS, STATE_SIZE, StateVector, batch_to_tensor, encode_state};
pub use persistence::{ModelMetadata, load_network, save_model};
