#![doc = include_str!("../README.md")]

pub mod handle;
pub mod memory;
pub mod session;
pub mod sys;

pub use handle::NvjpegHandle;
pub use memory::{CudaAllocator, CudaPlane, VramAccounting};
pub use session::NvjpegSession;
