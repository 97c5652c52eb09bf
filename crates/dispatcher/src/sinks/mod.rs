//! Notification sink implementations
//!
//! Contains LinePushSink.

mod line;

pub use self::line::{LinePushSink, DEFAULT_TOKEN_ENV, LINE_PUSH_ENDPOINT};
