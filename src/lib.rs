//! Sparse image streaming core: a self-delimited framed stream format plus
//! the download/upload engines that encode and decode it against an
//! imageio-style remote.

pub mod adapter;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod extent;
pub mod frame;

pub use engine::{download, upload};
pub use error::StreamError;
pub use extent::{Extent, ExtentKind};
