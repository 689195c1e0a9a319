//! Raw handle and status typedefs shared across crate boundaries.
//!
//! These mirror the CUDA runtime and nvJPEG C headers so that
//! `nvjet-pipeline` can carry device pointers and status codes in its
//! error type without depending on the `nvjet-nvjpeg` binding.

#![allow(non_camel_case_types)]

use std::ffi::c_void;

/// CUDA runtime status code (`cudaError_t`).
pub type cudaError_t = i32;
pub const CUDA_SUCCESS: cudaError_t = 0;

/// nvJPEG status code (`nvjpegStatus_t`).
pub type nvjpegStatus_t = i32;
pub const NVJPEG_STATUS_SUCCESS: nvjpegStatus_t = 0;

/// CUDA stream handle (`cudaStream_t`).  Opaque, owned by the binding.
pub type cudaStream_t = *mut c_void;

/// Raw device pointer.  64-bit on every platform CUDA supports.
pub type DevicePtr = u64;
