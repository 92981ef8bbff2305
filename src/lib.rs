//! Snake DQN - A Snake game with a Deep Q-Network agent that learns to play it
//!
//! This library provides:
//! - Core game logic (game module)
//! - DQN training infrastructure (rl module)
//! - TUI rendering (render module)
//! - Keyboard input handling (input module)
//! - Training and session statistics (metrics module)
//! - Execution modes: human play, training, and watching a trained agent
//!   (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
