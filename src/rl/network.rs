//! Q-network for the Snake DQN agent
//!
//! This module implements the fully connected network that approximates the
//! action-value function.
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 11]
//!   ↓ Linear(11 → 256) + ReLU
//!   ↓ Linear(256 → 256) + ReLU
//!   ↓ Linear(256 → 3)
//! Output: Q-values, one per action (straight, clockwise, counter-clockwise)
//! ```
//!
//! # Example
//!
//! ```rust
//! use snake_dqn::rl::{QNetworkConfig, QNetwork};
//! use burn::backend::ndarray::NdArrayDevice;
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//!
//! type Backend = NdArray<f32>;
//!
//! let device = NdArrayDevice::default();
//! let network = QNetworkConfig::new().init::<Backend>(&device);
//!
//! let observation = Tensor::zeros([4, 11], &device);
//! let q_values = network.forward(observation);
//!
//! assert_eq!(q_values.dims(), [4, 3]); // [batch, num_actions]
//! ```

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{Tensor, activation::relu, backend::Backend},
};

use super::observation::{NUM_ACTIONS, STATE_SIZE};

/// Configuration for the Q-network
#[derive(Debug, Clone)]
pub struct QNetworkConfig {
    /// Number of input features (default: 11 for the snake state vector)
    pub state_size: usize,

    /// Number of actions the network scores (default: 3)
    pub num_actions: usize,

    /// Width of the two hidden layers (default: 256)
    pub hidden_dim: usize,
}

impl QNetworkConfig {
    /// Create a new configuration with default hyperparameters
    pub fn new() -> Self {
        Self {
            state_size: STATE_SIZE,
            num_actions: NUM_ACTIONS,
            hidden_dim: 256,
        }
    }

    /// Initialize the Q-network from this configuration
    ///
    /// # Arguments
    ///
    /// * `device` - The device to place the network on
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            fc1: LinearConfig::new(self.state_size, self.hidden_dim).init(device),
            fc2: LinearConfig::new(self.hidden_dim, self.hidden_dim).init(device),
            output: LinearConfig::new(self.hidden_dim, self.num_actions).init(device),
        }
    }
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Fully connected Q-value network
///
/// The network is generic over the Burn backend, so the same definition runs
/// with or without automatic differentiation (`Autodiff` wrapper for
/// training, plain backend for inference).
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    /// First hidden layer: 11 → 256
    fc1: Linear<B>,
    /// Second hidden layer: 256 → 256
    fc2: Linear<B>,
    /// Output layer: 256 → 3 Q-values
    output: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// Forward pass through the network
    ///
    /// # Arguments
    ///
    /// * `state` - Tensor with shape `[batch, 11]`
    ///
    /// # Returns
    ///
    /// Q-values with shape `[batch, 3]`, one estimate per action
    pub fn forward(&self, state: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.fc1.forward(state));
        let x = relu(self.fc2.forward(x));
        self.output.forward(x)
    }
}
