//! Structured logging for GlossBot.
//!
//! Console output (plain or JSON), optional daily-rolling NDJSON files, and
//! token redaction for anything that might echo credentials.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LogOptions};
pub use redact::{mask_secret, redact_sensitive_data};
