pub mod human;
pub mod train;
pub mod watch;

pub use human::HumanMode;
pub use train::{TrainConfig, TrainMode};
pub use watch::WatchMode;
