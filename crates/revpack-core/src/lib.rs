pub mod config;
pub mod types;

pub use config::{ConfigError, RevpackConfig};
pub use types::*;
