//! Experience replay buffer for DQN training
//!
//! This module implements a bounded replay memory that stores transition
//! five-tuples and hands out uniformly sampled minibatches to decorrelate
//! training updates.

use rand::seq::index;

use super::observation::StateVector;

/// A single transition observed during environment interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Experience {
    /// State the action was taken from
    pub state: StateVector,
    /// Discrete action index taken
    pub action: usize,
    /// Reward received for the transition
    pub reward: f32,
    /// State reached after the action
    pub next_state: StateVector,
    /// Whether the episode terminated on this transition
    pub done: bool,
}

/// Fixed-capacity ring buffer of past transitions
///
/// Overwrites the oldest transition once capacity is reached, so the memory
/// always holds the most recent `capacity` experiences.
///
/// # Example
///
/// ```rust
/// use snake_dqn::rl::{Experience, ReplayBuffer, StateVector, STATE_SIZE};
///
/// let mut buffer = ReplayBuffer::new(1000);
///
/// let zeros = StateVector([0.0; STATE_SIZE]);
/// buffer.push(Experience {
///     state: zeros,
///     action: 0,
///     reward: -0.1,
///     next_state: zeros,
///     done: false,
/// });
///
/// assert_eq!(buffer.len(), 1);
/// ```
pub struct ReplayBuffer {
    buffer: Vec<Experience>,
    capacity: usize,
    position: usize,
}

impl ReplayBuffer {
    /// Create a new replay buffer with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
            position: 0,
        }
    }

    /// Add a transition, evicting the oldest when the buffer is full
    pub fn push(&mut self, experience: Experience) {
        if self.buffer.len() < self.capacity {
            self.buffer.push(experience);
        } else {
            self.buffer[self.position] = experience;
        }
        self.position = (self.position + 1) % self.capacity;
    }

    /// Sample a random minibatch without replacement
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` exceeds the number of stored transitions.
    pub fn sample(&self, batch_size: usize) -> Vec<Experience> {
        assert!(
            batch_size <= self.buffer.len(),
            "Not enough experiences to sample"
        );
        let mut rng = rand::thread_rng();
        let indices = index::sample(&mut rng, self.buffer.len(), batch_size);
        indices.iter().map(|i| self.buffer[i]).collect()
    }

    /// Number of stored transitions
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer contains no transitions
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Maximum number of transitions the buffer can hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
