//! # Plexus Kernel
//!
//! Minimal process-level glue around the plugin system: the shared error
//! type, host constants, and the [`Application`] bootstrap that owns one
//! orchestration run from discovery to shutdown.
pub mod bootstrap;
pub mod constants;
pub mod error;

pub use bootstrap::Application;
pub use error::{Error, Result};
