//! Common utilities and shared types for reunite.
//!
//! This crate provides foundational components used across all reunite crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Session**: Durable credential storage and the [`SessionGuard`]
//!
//! # Example
//!
//! ```no_run
//! use reunite_common::{Config, FileSessionStore, SessionGuard};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let store = FileSessionStore::default_location()?;
//! let guard = SessionGuard::new(Box::new(store)).await?;
//! println!("signed in: {}", guard.has_credential().await);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod session;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use session::{
    FileSessionStore, MemorySessionStore, SessionGuard, SessionStore, SessionStoreError,
};
