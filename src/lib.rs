pub mod components;
pub mod contracts;
pub mod error;
pub mod id;
pub mod motion;
pub mod prelude;
pub mod provider;
pub mod style;
pub mod theme;
pub mod tokens;

pub use error::{ConfigError, ConfigResult};
pub use provider::DialProvider;

#[cfg(test)]
mod test_public_api;
