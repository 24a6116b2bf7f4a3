//! Orchestration layer for a game audio decoding engine
//!
//! A stream is opened by probing a [`Resource`](io::Resource) against the
//! known container formats. The resulting [`StreamHandle`] renders
//! interleaved 16-bit PCM, handles looping and resets, and reports what it
//! is through [`StreamHandle::describe`].

pub mod cli;
pub mod coding;
pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod logging;
pub mod meta;
pub mod stream;

pub use cli::Cli;
pub use config::PlayConfig;
pub use error::{StreamError, StreamResult};
pub use logging::LogLevel;
pub use stream::{open, open_from_resource, open_with_probers, StreamHandle};
