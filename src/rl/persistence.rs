//! Model persistence for saving and loading trained agents
//!
//! This module provides functionality to save and load trained DQN agents,
//! including both the network weights and training metadata. It uses Burn's
//! Record system for serialization.

use super::{DqnAgent, DqnConfig, QNetwork, QNetworkConfig};
use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata saved with the model
///
/// Contains configuration and training information needed to properly
/// reconstruct and use the saved model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// DQN configuration used during training
    pub dqn_config: DqnConfig,

    /// Exploration rate at save time
    pub epsilon: f32,

    /// Total gradient steps completed
    pub training_steps: usize,

    /// Number of episodes trained
    pub episodes_trained: usize,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl ModelMetadata {
    /// Create new metadata
    pub fn new(
        dqn_config: DqnConfig,
        epsilon: f32,
        training_steps: usize,
        episodes_trained: usize,
    ) -> Self {
        Self {
            dqn_config,
            epsilon,
            training_steps,
            episodes_trained,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Save a trained DQN agent to a file
///
/// Serializes both the neural network weights and training metadata to the
/// specified path. Creates parent directories if they don't exist.
///
/// The model is saved in two files:
/// - `<path>` - Network weights (Burn record format)
/// - `<path>.meta.json` - Metadata as JSON
pub fn save_model<B: AutodiffBackend>(agent: &DqnAgent<B>, path: &Path) -> Result<()> {
    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    // Extract network and convert to record
    let network = agent.network();
    let record = network.clone().into_record();

    // Save network weights using Burn's recorder
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(record, path.to_path_buf())
        .context("Failed to save network weights")?;

    // Create metadata
    let metadata = ModelMetadata::new(
        agent.config().clone(),
        agent.epsilon(),
        agent.training_step(),
        agent.episodes_trained(),
    );

    // Save metadata as JSON
    let meta_path = path.with_extension("meta.json");
    let meta_json =
        serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Load a trained network from a file
///
/// Deserializes a previously saved model, returning both the network and its
/// associated metadata.
///
/// # Arguments
///
/// * `path` - Path to the saved model file (without .meta.json extension)
/// * `device` - Device to load the model onto
pub fn load_network<B: AutodiffBackend>(
    path: &Path,
    device: &B::Device,
) -> Result<(QNetwork<B>, ModelMetadata)> {
    // Load metadata first
    let meta_path = path.with_extension("meta.json");
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata: ModelMetadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    // Reconstruct network and load weights using Burn's recorder
    let mut network = QNetworkConfig::new().init::<B>(device);
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;

    network = network.load_record(record);

    Ok((network, metadata))
}
