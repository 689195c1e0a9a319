#![doc = include_str!("../README.md")]

pub mod batch;
pub mod bmp;
pub mod context;
pub mod orchestrator;
pub mod output;

pub use batch::{BatchReader, EncodedImage};
pub use context::DecoderContext;
pub use orchestrator::{run, RunConfig, RunSummary};
pub use output::{OutputBufferManager, PreparedImage};
