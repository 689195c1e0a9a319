#![doc = include_str!("../README.md")]

pub mod codec_traits;
pub mod error;
pub mod ffi_types;
pub mod types;
