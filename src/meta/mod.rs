//! Container probers
//!
//! Each prober checks its magic, reads the header, fills a fresh
//! [`StreamHandle`](crate::stream::StreamHandle) and opens the channel
//! resources. Validation and finalizing are left to the probing pipeline.

pub mod ast;
pub mod dsp;
pub mod ogg;
pub mod riff;
pub mod vag;
