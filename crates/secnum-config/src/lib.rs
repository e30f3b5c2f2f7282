pub mod config;
pub mod error;
pub mod rules;
pub mod templates;

pub use config::Config;
pub use error::ConfigError;
pub use rules::PathRule;
