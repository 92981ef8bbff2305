//! DQN (Deep Q-Network) agent implementation
//!
//! This module implements the DQN training loop for the Snake agent:
//! epsilon-greedy action selection, experience replay, and the one-step
//! Q-learning update with a bootstrapped target.

use super::buffer::{Experience, ReplayBuffer};
use super::config::DqnConfig;
use super::network::QNetwork;
use super::observation::{batch_to_tensor, StateVector, NUM_ACTIONS};
use burn::{
    module::AutodiffModule,
    optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor},
    tensor::{Tensor, TensorData, backend::AutodiffBackend},
};
use rand::Rng;

/// DQN agent for reinforcement learning
///
/// Combines the Q-network with a replay memory and the epsilon-greedy policy.
/// Each call to [`replay`](DqnAgent::replay) samples a random minibatch from
/// memory and performs one gradient step against the bootstrapped target
/// `r + gamma * max_a' Q(s', a')`.
///
/// # Type Parameters
///
/// * `B` - Autodiff backend for gradient computation
pub struct DqnAgent<B: AutodiffBackend> {
    /// Q-value network
    network: QNetwork<B>,

    /// Adam optimizer for network parameters
    optim: OptimizerAdaptor<Adam, QNetwork<B>, B>,

    /// DQN hyperparameters
    config: DqnConfig,

    /// Replay memory of past transitions
    buffer: ReplayBuffer,

    /// Current exploration rate
    epsilon: f32,

    /// Gradient steps performed
    training_step: usize,

    /// Episodes completed
    episodes_trained: usize,

    /// Device for tensor operations
    device: B::Device,
}

impl<B: AutodiffBackend> DqnAgent<B> {
    /// Create a new DQN agent
    ///
    /// # Arguments
    ///
    /// * `network` - Q-value network
    /// * `config` - DQN hyperparameters (validated here)
    /// * `device` - Device for computation
    pub fn new(network: QNetwork<B>, config: DqnConfig, device: B::Device) -> Self {
        config.validate().expect("Invalid DQN configuration");

        let optim = AdamConfig::new().init();
        let buffer = ReplayBuffer::new(config.replay_capacity);
        let epsilon = config.epsilon_start;

        Self {
            network,
            optim,
            config,
            buffer,
            epsilon,
            training_step: 0,
            episodes_trained: 0,
            device,
        }
    }

    /// Select an action with the epsilon-greedy policy
    ///
    /// With probability epsilon a uniformly random action is returned;
    /// otherwise the action with the highest Q-value estimate.
    pub fn select_action(&self, observation: &StateVector) -> usize {
        let mut rng = rand::thread_rng();
        if rng.gen::<f32>() < self.epsilon {
            return rng.gen_range(0..NUM_ACTIONS);
        }

        self.greedy_action(observation)
    }

    /// Select the action with the highest Q-value (no exploration)
    pub fn greedy_action(&self, observation: &StateVector) -> usize {
        // Forward pass in valid (no-grad) mode
        let network = self.network.clone().valid();
        let input = observation
            .to_tensor::<B::InnerBackend>(&self.device)
            .unsqueeze_dim(0); // [1, 11]
        let q_values = network.forward(input);

        argmax(&q_values.into_data().to_vec().expect("Q-values as vec"))
    }

    /// Store a transition in the replay memory
    pub fn remember(
        &mut self,
        state: StateVector,
        action: usize,
        reward: f32,
        next_state: StateVector,
        done: bool,
    ) {
        self.buffer.push(Experience {
            state,
            action,
            reward,
            next_state,
            done,
        });
    }

    /// Train on a random minibatch of past transitions
    ///
    /// Returns `None` until the memory holds at least one full batch, so the
    /// early steps of training are pure experience collection.
    pub fn replay(&mut self) -> Option<f32> {
        if self.buffer.len() < self.config.batch_size {
            return None;
        }

        let batch = self.buffer.sample(self.config.batch_size);
        Some(self.train_step(&batch))
    }

    /// Perform one gradient update on the given minibatch
    fn train_step(&mut self, batch: &[Experience]) -> f32 {
        let batch_size = batch.len();

        let states: Vec<StateVector> = batch.iter().map(|e| e.state).collect();
        let next_states: Vec<StateVector> = batch.iter().map(|e| e.next_state).collect();

        // Bootstrapped targets from the network's own (no-grad) predictions:
        // target = r + gamma * max_a' Q(s', a') * (1 - done)
        let next_q = self
            .network
            .clone()
            .valid()
            .forward(batch_to_tensor::<B::InnerBackend>(
                &next_states,
                &self.device,
            ));
        let next_q_data: Vec<f32> = next_q.into_data().to_vec().expect("Q-values as vec");

        let mut target_data = Vec::with_capacity(batch_size);
        for (i, exp) in batch.iter().enumerate() {
            let max_next_q = next_q_data[i * NUM_ACTIONS..(i + 1) * NUM_ACTIONS]
                .iter()
                .fold(f32::NEG_INFINITY, |acc, &q| acc.max(q));

            let target = if exp.done {
                exp.reward
            } else {
                exp.reward + self.config.gamma * max_next_q
            };
            target_data.push(target);
        }

        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(target_data, [batch_size, 1]),
            &self.device,
        );

        // Q(s, a) for the taken actions, selected with a one-hot mask
        let mut mask_data = vec![0.0f32; batch_size * NUM_ACTIONS];
        for (i, exp) in batch.iter().enumerate() {
            mask_data[i * NUM_ACTIONS + exp.action] = 1.0;
        }
        let action_mask = Tensor::<B, 2>::from_data(
            TensorData::new(mask_data, [batch_size, NUM_ACTIONS]),
            &self.device,
        );

        let q_all = self
            .network
            .forward(batch_to_tensor::<B>(&states, &self.device));
        let q_taken = (q_all * action_mask).sum_dim(1); // [batch, 1]

        // MSE loss against the targets
        let diff = q_taken - targets;
        let loss = (diff.clone() * diff).mean();

        let loss_value: f32 = loss
            .clone()
            .into_data()
            .to_vec::<f32>()
            .expect("loss as vec")[0];

        // Backward pass and optimizer step
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.network);
        self.network = self
            .optim
            .step(self.config.learning_rate, self.network.clone(), grads);

        self.training_step += 1;

        loss_value
    }

    /// Decay epsilon after an episode, respecting the configured floor
    pub fn decay_epsilon(&mut self) {
        if self.epsilon > self.config.epsilon_min {
            self.epsilon *= self.config.epsilon_decay;
        }
    }

    /// Mark an episode as finished
    pub fn finish_episode(&mut self) {
        self.episodes_trained += 1;
        self.decay_epsilon();
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Set epsilon directly (e.g. when restoring from a checkpoint)
    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon;
    }

    /// Number of gradient steps performed
    pub fn training_step(&self) -> usize {
        self.training_step
    }

    /// Number of episodes completed
    pub fn episodes_trained(&self) -> usize {
        self.episodes_trained
    }

    /// Number of transitions currently in the replay memory
    pub fn memory_len(&self) -> usize {
        self.buffer.len()
    }

    /// Get a reference to the Q-network
    pub fn network(&self) -> &QNetwork<B> {
        &self.network
    }

    /// Get a reference to the DQN configuration
    pub fn config(&self) -> &DqnConfig {
        &self.config
    }
}

/// Index of the largest value in a Q-value row
fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}
