//! Common utilities and shared types for redwave.
//!
//! This crate provides foundational components used across all redwave crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Tokens**: JWT issue/verify via [`TokenManager`]
//!
//! # Example
//!
//! ```no_run
//! use redwave_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod token;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use token::{Claims, TokenManager};
