//! Infrastructure layer module
//!
//! This module contains the adapters to the outside world:
//! - Chat-completions API client
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod openai;
