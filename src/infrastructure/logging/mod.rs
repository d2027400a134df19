//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON console output on stderr
//! - Optional rotated JSON log files
//! - Secret scrubbing for user-facing and logged error text

pub mod logger;
pub mod secret_scrubbing;

pub use logger::LoggerImpl;
pub use secret_scrubbing::SecretScrubber;
