//! Core business logic for redwave.

pub mod services;

pub use services::*;
