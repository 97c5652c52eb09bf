//! Subscriber implementations
//!
//! Contains SinkSubscriber and LogSubscriber.

mod log;
mod sink;

pub use self::log::LogSubscriber;
pub use self::sink::SinkSubscriber;
