pub mod config;
pub mod error;

pub use config::DTopologyConfig;
pub use error::{DTopologyError, Result};
