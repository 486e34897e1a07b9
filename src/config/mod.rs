// src/config/mod.rs

//! Configuration for cmdserver.
//!
//! Responsibilities:
//! - Define the immutable startup data model (`model.rs`).
//! - Turn parsed CLI arguments into a validated [`AppConfig`] (`validate.rs`).
//!
//! Everything here is built once in `run` and shared read-only afterwards.

pub mod model;
pub mod validate;

pub use model::{AppConfig, CommandSpec, ServerConfig};
