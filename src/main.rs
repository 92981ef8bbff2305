use anyhow::Result;
use clap::{Parser, ValueEnum};
use snake_dqn::game::GameConfig;
use snake_dqn::modes::{HumanMode, TrainConfig, TrainMode, WatchMode};
use snake_dqn::rl::{InferenceBackend, TrainingBackend, default_device};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake_dqn")]
#[command(version, about = "Snake game with a DQN agent that learns to play it")]
struct Cli {
    /// Execution mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Grid width
    #[arg(long, default_value = "30")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "22")]
    height: usize,

    /// Number of training episodes (train mode)
    #[arg(long, default_value = "1000")]
    episodes: usize,

    /// Model path to save to (train mode) or load from (watch mode)
    #[arg(long, default_value = "models/snake.bin")]
    model: PathBuf,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Train the DQN agent headlessly
    Train,
    /// Watch a trained agent play
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Create game configuration from CLI arguments
    let config = GameConfig::new(cli.width, cli.height);

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config);
            human_mode.run().await?;
        }
        Mode::Train => {
            let mut train_config = TrainConfig::new(cli.episodes, cli.model);
            train_config.game_config = config;

            let device = default_device();
            let mut train_mode = TrainMode::<TrainingBackend>::new(train_config, device);
            train_mode.run()?;
        }
        Mode::Watch => {
            let device = default_device();
            let mut watch_mode = WatchMode::<InferenceBackend>::new(&cli.model, config, device)?;
            watch_mode.run().await?;
        }
    }

    Ok(())
}
