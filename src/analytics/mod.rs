//! Diagnostic event logging for analysis attempts.
pub mod logger;
