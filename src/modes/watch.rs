//! Visualization mode for watching trained agents
//!
//! This module implements a TUI-based mode that loads a trained model and
//! displays the agent playing Snake with the greedy policy. Users can control
//! playback speed, pause, and reset episodes.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Reset episode
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use burn::module::AutodiffModule;
use burn::tensor::backend::Backend;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{Stderr, stderr},
    path::Path,
    time::Duration,
};
use tokio::time::{Interval, interval};

use crate::game::GameConfig;
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::rl::{ModelMetadata, QNetwork, SnakeEnvironment, load_network};

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// Slow: 2 Hz (500ms per step)
    Slow,
    /// Normal: 10 Hz (100ms per step) - same as human mode
    Normal,
    /// Fast: 20 Hz (50ms per step)
    Fast,
    /// Very Fast: 60 Hz (16ms per step)
    VeryFast,
}

impl PlaybackSpeed {
    /// Get the tick interval for this speed
    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(100),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }
}

/// Watch mode for visualizing trained agents
pub struct WatchMode<B: Backend> {
    /// Trained Q-network (in inference mode)
    network: QNetwork<B>,

    /// Snake environment
    env: SnakeEnvironment,

    /// Renderer for TUI display
    renderer: Renderer,

    /// Session metrics (high score across episodes)
    metrics: GameMetrics,

    /// Device for tensor operations
    device: B::Device,

    /// Whether to quit the visualization
    should_quit: bool,

    /// Whether playback is paused
    paused: bool,

    /// Current playback speed
    speed: PlaybackSpeed,

    /// Number of episodes completed
    episode_count: usize,
}

impl<B: Backend> WatchMode<B> {
    /// Create a new watch mode
    ///
    /// Loads a trained model from the specified path and initializes the
    /// playback environment.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the saved model file
    /// * `config` - Game configuration
    /// * `device` - Device for computation
    pub fn new(model_path: &Path, config: GameConfig, device: B::Device) -> Result<Self> {
        // Load trained network, then strip the autodiff wrapper for inference
        use burn::backend::Autodiff;
        let (network, metadata) = load_network::<Autodiff<B>>(model_path, &device)
            .with_context(|| format!("Failed to load model from {:?}", model_path))?;
        let network = network.valid();

        Self::print_model_info(model_path, &metadata);

        let env = SnakeEnvironment::new(config);

        Ok(Self {
            network,
            env,
            renderer: Renderer::new(),
            metrics: GameMetrics::new(),
            device,
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
            episode_count: 0,
        })
    }

    fn print_model_info(model_path: &Path, metadata: &ModelMetadata) {
        println!("{}", "=".repeat(60));
        println!("Loaded Model Information");
        println!("{}", "=".repeat(60));
        println!("Model path: {:?}", model_path);
        println!("Episodes trained: {}", metadata.episodes_trained);
        println!("Training steps: {}", metadata.training_steps);
        println!("Final epsilon: {:.3}", metadata.epsilon);
        println!("Version: {}", metadata.version);
        println!("{}", "=".repeat(60));
        println!();
        println!("Starting visualization...");
        println!();
    }

    /// Run the playback loop
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_playback_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    /// Main playback loop
    async fn run_playback_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks based on speed
        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        self.env.reset();
        let mut done = false;

        loop {
            tokio::select! {
                // Handle keyboard input
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if !self.paused {
                        if done {
                            // Auto-restart
                            self.metrics.on_game_over(self.env.state().score);
                            self.env.reset();
                            self.metrics.on_game_start();
                            done = false;
                            self.episode_count += 1;
                        } else {
                            done = self.step_agent();
                        }
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.env.state(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Step the agent forward one action with the greedy policy
    ///
    /// Returns true when the episode terminated.
    fn step_agent(&mut self) -> bool {
        let obs = self.env.observation();

        let input = obs.to_tensor::<B>(&self.device).unsqueeze_dim(0); // [1, 11]
        let q_values = self.network.forward(input);
        let q_vec: Vec<f32> = q_values
            .into_data()
            .to_vec()
            .expect("Q-values as vec");
        let action = argmax_action(&q_vec);

        let (_next_obs, _reward, done) = self.env.step(action);
        done
    }

    /// Handle keyboard events
    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            // Only process key press events
            if key.kind != KeyEventKind::Press {
                return;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char(' ') => {
                    self.paused = !self.paused;
                }
                KeyCode::Char('r') => {
                    // Manual reset
                    self.env.reset();
                    self.episode_count += 1;
                }
                KeyCode::Char('1') => {
                    self.change_speed(PlaybackSpeed::Slow, tick_timer);
                }
                KeyCode::Char('2') => {
                    self.change_speed(PlaybackSpeed::Normal, tick_timer);
                }
                KeyCode::Char('3') => {
                    self.change_speed(PlaybackSpeed::Fast, tick_timer);
                }
                KeyCode::Char('4') => {
                    self.change_speed(PlaybackSpeed::VeryFast, tick_timer);
                }
                _ => {}
            }
        }
    }

    /// Change the playback speed
    fn change_speed(&mut self, new_speed: PlaybackSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        tick_timer.reset_after(self.speed.tick_interval());
    }

    /// Cleanup terminal state
    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Select the action with the highest Q-value
fn argmax_action(q_values: &[f32]) -> usize {
    q_values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{DqnAgent, DqnConfig, InferenceBackend, QNetworkConfig, TrainingBackend};
    use crate::rl::{default_device, save_model};
    use tempfile::TempDir;

    #[test]
    fn test_playback_speed() {
        assert_eq!(
            PlaybackSpeed::Slow.tick_interval(),
            Duration::from_millis(500)
        );
        assert_eq!(
            PlaybackSpeed::Normal.tick_interval(),
            Duration::from_millis(100)
        );
        assert_eq!(
            PlaybackSpeed::Fast.tick_interval(),
            Duration::from_millis(50)
        );
        assert_eq!(
            PlaybackSpeed::VeryFast.tick_interval(),
            Duration::from_millis(16)
        );
    }

    #[test]
    fn test_argmax_action() {
        assert_eq!(argmax_action(&[0.1, 0.6, 0.2]), 1);
        assert_eq!(argmax_action(&[1.0, -1.0, 0.0]), 0);
        assert_eq!(argmax_action(&[-1.0, -0.5, -0.1]), 2);
    }

    #[test]
    fn test_watch_mode_creation() {
        let temp_dir = TempDir::new().unwrap();
        let model_path = temp_dir.path().join("test_model.bin");

        // Create and save a test model
        let device = default_device();
        let network = QNetworkConfig::new().init::<TrainingBackend>(&device);
        let agent = DqnAgent::new(network, DqnConfig::default(), device.clone());

        save_model(&agent, &model_path).unwrap();

        // Load in watch mode
        let config = GameConfig::small();
        let watch_mode = WatchMode::<InferenceBackend>::new(&model_path, config, device);

        assert!(watch_mode.is_ok());
        let mode = watch_mode.unwrap();
        assert_eq!(mode.episode_count, 0);
        assert!(!mode.paused);
        assert_eq!(mode.speed, PlaybackSpeed::Normal);
    }

    #[test]
    fn test_step_agent_advances_game() {
        let temp_dir = TempDir::new().unwrap();
        let model_path = temp_dir.path().join("test_model.bin");

        let device = default_device();
        let network = QNetworkConfig::new().init::<TrainingBackend>(&device);
        let agent = DqnAgent::new(network, DqnConfig::default(), device.clone());
        save_model(&agent, &model_path).unwrap();

        let mut mode =
            WatchMode::<InferenceBackend>::new(&model_path, GameConfig::small(), device).unwrap();

        let steps_before = mode.env.state().steps;
        mode.step_agent();
        assert_eq!(mode.env.state().steps, steps_before + 1);
    }
}
