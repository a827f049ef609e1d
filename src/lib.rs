pub mod config;
pub mod controller;
pub mod ctrl;
pub mod curve;
pub mod error;
pub mod event;
pub mod interpolate;
pub mod window;

pub use config::MemCtrlConfig;
pub use ctrl::MessMemCtrl;
pub use error::{AccessError, ConfigError, StateError, UsageError};
pub use event::{AccessKind, SplitLatency, TimingEventShim};
