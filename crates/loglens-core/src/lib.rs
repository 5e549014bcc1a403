pub mod access;
pub mod analysis;
pub mod config;
pub mod error;
pub mod locate;
pub mod render;

pub use config::Config;
pub use error::{Error, Result};
