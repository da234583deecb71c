//! Tunecast - music library server with on-demand HLS audio streaming.
//!
//! This library crate exposes the pieces of the binary that integration
//! tests drive directly.

pub mod import;
