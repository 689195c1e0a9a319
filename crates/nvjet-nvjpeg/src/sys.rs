//! Raw FFI bindings to the CUDA runtime and nvJPEG (decoupled decode API).
//!
//! Covers the minimal subset required by [`NvjpegHandle`](super::handle),
//! [`NvjpegSession`](super::session), and [`CudaAllocator`](super::memory).
//! Matches nvJPEG headers shipped with CUDA 11.x/12.x.
//!
//! # Loading
//!
//! On Linux both libraries are resolved at runtime with `dlopen`
//! (`libcudart.so`, `libnvjpeg.so`), so no link-time CUDA dependency
//! exists and GPU-less hosts can still build and unit-test every crate.
//! Other platforms link `cudart`/`nvjpeg` via `build.rs` and `CUDA_PATH`.
//!
//! # Safety
//!
//! Every function pointer in [`Api`] is `unsafe extern "C"`.  The safe
//! wrappers in `handle.rs`, `session.rs`, and `memory.rs` enforce handle
//! validity and destruction order.

#![allow(non_camel_case_types, non_snake_case, non_upper_case_globals, dead_code)]

use std::ffi::c_void;
use std::os::raw::{c_int, c_uint};
use std::sync::OnceLock;

use nvjet_core::error::{EngineError, Result};
use nvjet_core::ffi_types::{
    cudaError_t, cudaStream_t, nvjpegStatus_t, CUDA_SUCCESS, NVJPEG_STATUS_SUCCESS,
};

#[cfg(target_os = "linux")]
use std::ffi::{c_char, CStr, CString};

// ═══════════════════════════════════════════════════════════════════════════
//  TYPES & CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════

pub type nvjpegHandle_t = *mut c_void;
pub type nvjpegJpegState_t = *mut c_void;
pub type nvjpegJpegDecoder_t = *mut c_void;
pub type nvjpegBufferPinned_t = *mut c_void;
pub type nvjpegBufferDevice_t = *mut c_void;
pub type nvjpegJpegStream_t = *mut c_void;
pub type nvjpegDecodeParams_t = *mut c_void;

/// `nvjpegBackend_t`.
pub const NVJPEG_BACKEND_DEFAULT: c_int = 0;
pub const NVJPEG_BACKEND_HYBRID: c_int = 1;
pub const NVJPEG_BACKEND_GPU_HYBRID: c_int = 2;

/// `nvjpegChromaSubsampling_t`.
pub const NVJPEG_CSS_444: c_int = 0;
pub const NVJPEG_CSS_422: c_int = 1;
pub const NVJPEG_CSS_420: c_int = 2;
pub const NVJPEG_CSS_440: c_int = 3;
pub const NVJPEG_CSS_411: c_int = 4;
pub const NVJPEG_CSS_410: c_int = 5;
pub const NVJPEG_CSS_GRAY: c_int = 6;
pub const NVJPEG_CSS_UNKNOWN: c_int = -1;

pub const NVJPEG_MAX_COMPONENT: usize = 4;

/// `nvjpegImage_t` — output plane pointers and row pitches.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct nvjpegImage_t {
    pub channel: [*mut u8; NVJPEG_MAX_COMPONENT],
    pub pitch: [usize; NVJPEG_MAX_COMPONENT],
}

impl Default for nvjpegImage_t {
    fn default() -> Self {
        Self {
            channel: [std::ptr::null_mut(); NVJPEG_MAX_COMPONENT],
            pitch: [0; NVJPEG_MAX_COMPONENT],
        }
    }
}

/// `cudaStreamCreateWithFlags` flag for a stream that does not
/// synchronize with the legacy default stream.
pub const cudaStreamNonBlocking: c_uint = 0x01;

/// `cudaMemcpyKind::cudaMemcpyDeviceToHost`.
pub const cudaMemcpyDeviceToHost: c_int = 2;

// ═══════════════════════════════════════════════════════════════════════════
//  API TABLE
// ═══════════════════════════════════════════════════════════════════════════

/// Resolved function pointers for every CUDA runtime and nvJPEG entry
/// point the engine calls.
pub struct Api {
    // ── CUDA runtime ──────────────────────────────────────────────────
    pub cudaSetDevice: unsafe extern "C" fn(c_int) -> cudaError_t,
    pub cudaStreamCreateWithFlags: unsafe extern "C" fn(*mut cudaStream_t, c_uint) -> cudaError_t,
    pub cudaStreamDestroy: unsafe extern "C" fn(cudaStream_t) -> cudaError_t,
    pub cudaStreamSynchronize: unsafe extern "C" fn(cudaStream_t) -> cudaError_t,
    pub cudaMalloc: unsafe extern "C" fn(*mut *mut c_void, usize) -> cudaError_t,
    pub cudaFree: unsafe extern "C" fn(*mut c_void) -> cudaError_t,
    pub cudaMemcpy2D: unsafe extern "C" fn(
        *mut c_void,
        usize,
        *const c_void,
        usize,
        usize,
        usize,
        c_int,
    ) -> cudaError_t,

    // ── nvJPEG handle & probe ─────────────────────────────────────────
    pub nvjpegCreateEx: unsafe extern "C" fn(
        c_int,
        *mut c_void,
        *mut c_void,
        c_uint,
        *mut nvjpegHandle_t,
    ) -> nvjpegStatus_t,
    pub nvjpegDestroy: unsafe extern "C" fn(nvjpegHandle_t) -> nvjpegStatus_t,
    pub nvjpegGetImageInfo: unsafe extern "C" fn(
        nvjpegHandle_t,
        *const u8,
        usize,
        *mut c_int,
        *mut c_int,
        *mut c_int,
        *mut c_int,
    ) -> nvjpegStatus_t,

    // ── Decoders & states ─────────────────────────────────────────────
    pub nvjpegDecoderCreate:
        unsafe extern "C" fn(nvjpegHandle_t, c_int, *mut nvjpegJpegDecoder_t) -> nvjpegStatus_t,
    pub nvjpegDecoderDestroy: unsafe extern "C" fn(nvjpegJpegDecoder_t) -> nvjpegStatus_t,
    pub nvjpegDecoderStateCreate: unsafe extern "C" fn(
        nvjpegHandle_t,
        nvjpegJpegDecoder_t,
        *mut nvjpegJpegState_t,
    ) -> nvjpegStatus_t,
    pub nvjpegJpegStateDestroy: unsafe extern "C" fn(nvjpegJpegState_t) -> nvjpegStatus_t,

    // ── Transient buffers & bitstream handles ─────────────────────────
    pub nvjpegBufferPinnedCreate: unsafe extern "C" fn(
        nvjpegHandle_t,
        *mut c_void,
        *mut nvjpegBufferPinned_t,
    ) -> nvjpegStatus_t,
    pub nvjpegBufferPinnedDestroy: unsafe extern "C" fn(nvjpegBufferPinned_t) -> nvjpegStatus_t,
    pub nvjpegBufferDeviceCreate: unsafe extern "C" fn(
        nvjpegHandle_t,
        *mut c_void,
        *mut nvjpegBufferDevice_t,
    ) -> nvjpegStatus_t,
    pub nvjpegBufferDeviceDestroy: unsafe extern "C" fn(nvjpegBufferDevice_t) -> nvjpegStatus_t,
    pub nvjpegJpegStreamCreate:
        unsafe extern "C" fn(nvjpegHandle_t, *mut nvjpegJpegStream_t) -> nvjpegStatus_t,
    pub nvjpegJpegStreamDestroy: unsafe extern "C" fn(nvjpegJpegStream_t) -> nvjpegStatus_t,
    pub nvjpegJpegStreamParse: unsafe extern "C" fn(
        nvjpegHandle_t,
        *const u8,
        usize,
        c_int,
        c_int,
        nvjpegJpegStream_t,
    ) -> nvjpegStatus_t,
    pub nvjpegStateAttachPinnedBuffer:
        unsafe extern "C" fn(nvjpegJpegState_t, nvjpegBufferPinned_t) -> nvjpegStatus_t,
    pub nvjpegStateAttachDeviceBuffer:
        unsafe extern "C" fn(nvjpegJpegState_t, nvjpegBufferDevice_t) -> nvjpegStatus_t,

    // ── Decode parameters ─────────────────────────────────────────────
    pub nvjpegDecodeParamsCreate:
        unsafe extern "C" fn(nvjpegHandle_t, *mut nvjpegDecodeParams_t) -> nvjpegStatus_t,
    pub nvjpegDecodeParamsDestroy: unsafe extern "C" fn(nvjpegDecodeParams_t) -> nvjpegStatus_t,
    pub nvjpegDecodeParamsSetOutputFormat:
        unsafe extern "C" fn(nvjpegDecodeParams_t, c_int) -> nvjpegStatus_t,
    pub nvjpegDecodeParamsSetROI:
        unsafe extern "C" fn(nvjpegDecodeParams_t, c_int, c_int, c_int, c_int) -> nvjpegStatus_t,

    // ── Decoupled decode calls ────────────────────────────────────────
    pub nvjpegDecodeJpegHost: unsafe extern "C" fn(
        nvjpegHandle_t,
        nvjpegJpegDecoder_t,
        nvjpegJpegState_t,
        nvjpegDecodeParams_t,
        nvjpegJpegStream_t,
    ) -> nvjpegStatus_t,
    pub nvjpegDecodeJpegTransferToDevice: unsafe extern "C" fn(
        nvjpegHandle_t,
        nvjpegJpegDecoder_t,
        nvjpegJpegState_t,
        nvjpegJpegStream_t,
        cudaStream_t,
    ) -> nvjpegStatus_t,
    pub nvjpegDecodeJpegDevice: unsafe extern "C" fn(
        nvjpegHandle_t,
        nvjpegJpegDecoder_t,
        nvjpegJpegState_t,
        *mut nvjpegImage_t,
        cudaStream_t,
    ) -> nvjpegStatus_t,
}

static API: OnceLock<std::result::Result<Api, String>> = OnceLock::new();

impl Api {
    /// Resolve (once) and return the process-wide API table.
    pub fn get() -> Result<&'static Api> {
        let api = API.get_or_init(init_api);
        api.as_ref().map_err(|err| {
            EngineError::DriverLoad(format!(
                "failed to load CUDA runtime / nvJPEG: {err}. \
Ensure the CUDA toolkit libraries are installed and visible via LD_LIBRARY_PATH."
            ))
        })
    }
}

// ─── Status checks ───────────────────────────────────────────────────────

/// Map a CUDA runtime status to the fatal error class, tagged with the
/// failing call's name.
#[inline]
pub fn check_cuda(code: cudaError_t, call: &'static str) -> Result<()> {
    if code == CUDA_SUCCESS {
        Ok(())
    } else {
        Err(EngineError::Cuda { call, code })
    }
}

/// Map an nvJPEG status to the fatal error class, tagged with the
/// failing call's name.
#[inline]
pub fn check_nvjpeg(code: nvjpegStatus_t, call: &'static str) -> Result<()> {
    if code == NVJPEG_STATUS_SUCCESS {
        Ok(())
    } else {
        Err(EngineError::Nvjpeg { call, code })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  LINUX LOADER (dlopen)
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(target_os = "linux")]
extern "C" {
    fn dlopen(filename: *const c_char, flags: i32) -> *mut c_void;
    fn dlerror() -> *const c_char;
    fn dlsym(handle: *mut c_void, symbol: *const c_char) -> *mut c_void;
}

#[cfg(target_os = "linux")]
const RTLD_NOW: i32 = 2;
#[cfg(target_os = "linux")]
const RTLD_GLOBAL: i32 = 0x100;

#[cfg(target_os = "linux")]
fn last_dl_error() -> String {
    // SAFETY: dlerror returns a thread-local C string or null.
    unsafe {
        let p = dlerror();
        if p.is_null() {
            "unknown dl error".to_string()
        } else {
            CStr::from_ptr(p).to_string_lossy().to_string()
        }
    }
}

#[cfg(target_os = "linux")]
fn open_first(candidates: &[&str]) -> std::result::Result<*mut c_void, String> {
    let mut last_err = "unknown dlopen error".to_string();
    for candidate in candidates {
        let soname =
            CString::new(*candidate).map_err(|_| format!("invalid soname: {candidate}"))?;
        // SAFETY: static soname and valid dlopen flags.
        let handle = unsafe { dlopen(soname.as_ptr(), RTLD_NOW | RTLD_GLOBAL) };
        if !handle.is_null() {
            return Ok(handle);
        }
        last_err = last_dl_error();
    }
    Err(format!("dlopen({}) failed: {last_err}", candidates.join("|")))
}

#[cfg(target_os = "linux")]
fn load_symbol<T>(handle: *mut c_void, name: &'static str) -> std::result::Result<T, String> {
    let cname = CString::new(name).map_err(|_| format!("invalid symbol name: {name}"))?;
    // SAFETY: handle is a dlopen handle and cname is NUL-terminated.
    let ptr = unsafe { dlsym(handle, cname.as_ptr()) };
    if ptr.is_null() {
        Err(format!("dlsym({name}) failed: {}", last_dl_error()))
    } else {
        // SAFETY: ptr points to a function symbol with signature T.
        Ok(unsafe { std::mem::transmute_copy(&ptr) })
    }
}

#[cfg(target_os = "linux")]
fn init_api() -> std::result::Result<Api, String> {
    let cudart = open_first(&["libcudart.so.12", "libcudart.so.11.0", "libcudart.so"])?;
    let nvjpeg = open_first(&["libnvjpeg.so.12", "libnvjpeg.so.11", "libnvjpeg.so"])?;

    Ok(Api {
        cudaSetDevice: load_symbol(cudart, "cudaSetDevice")?,
        cudaStreamCreateWithFlags: load_symbol(cudart, "cudaStreamCreateWithFlags")?,
        cudaStreamDestroy: load_symbol(cudart, "cudaStreamDestroy")?,
        cudaStreamSynchronize: load_symbol(cudart, "cudaStreamSynchronize")?,
        cudaMalloc: load_symbol(cudart, "cudaMalloc")?,
        cudaFree: load_symbol(cudart, "cudaFree")?,
        cudaMemcpy2D: load_symbol(cudart, "cudaMemcpy2D")?,
        nvjpegCreateEx: load_symbol(nvjpeg, "nvjpegCreateEx")?,
        nvjpegDestroy: load_symbol(nvjpeg, "nvjpegDestroy")?,
        nvjpegGetImageInfo: load_symbol(nvjpeg, "nvjpegGetImageInfo")?,
        nvjpegDecoderCreate: load_symbol(nvjpeg, "nvjpegDecoderCreate")?,
        nvjpegDecoderDestroy: load_symbol(nvjpeg, "nvjpegDecoderDestroy")?,
        nvjpegDecoderStateCreate: load_symbol(nvjpeg, "nvjpegDecoderStateCreate")?,
        nvjpegJpegStateDestroy: load_symbol(nvjpeg, "nvjpegJpegStateDestroy")?,
        nvjpegBufferPinnedCreate: load_symbol(nvjpeg, "nvjpegBufferPinnedCreate")?,
        nvjpegBufferPinnedDestroy: load_symbol(nvjpeg, "nvjpegBufferPinnedDestroy")?,
        nvjpegBufferDeviceCreate: load_symbol(nvjpeg, "nvjpegBufferDeviceCreate")?,
        nvjpegBufferDeviceDestroy: load_symbol(nvjpeg, "nvjpegBufferDeviceDestroy")?,
        nvjpegJpegStreamCreate: load_symbol(nvjpeg, "nvjpegJpegStreamCreate")?,
        nvjpegJpegStreamDestroy: load_symbol(nvjpeg, "nvjpegJpegStreamDestroy")?,
        nvjpegJpegStreamParse: load_symbol(nvjpeg, "nvjpegJpegStreamParse")?,
        nvjpegStateAttachPinnedBuffer: load_symbol(nvjpeg, "nvjpegStateAttachPinnedBuffer")?,
        nvjpegStateAttachDeviceBuffer: load_symbol(nvjpeg, "nvjpegStateAttachDeviceBuffer")?,
        nvjpegDecodeParamsCreate: load_symbol(nvjpeg, "nvjpegDecodeParamsCreate")?,
        nvjpegDecodeParamsDestroy: load_symbol(nvjpeg, "nvjpegDecodeParamsDestroy")?,
        nvjpegDecodeParamsSetOutputFormat: load_symbol(
            nvjpeg,
            "nvjpegDecodeParamsSetOutputFormat",
        )?,
        nvjpegDecodeParamsSetROI: load_symbol(nvjpeg, "nvjpegDecodeParamsSetROI")?,
        nvjpegDecodeJpegHost: load_symbol(nvjpeg, "nvjpegDecodeJpegHost")?,
        nvjpegDecodeJpegTransferToDevice: load_symbol(
            nvjpeg,
            "nvjpegDecodeJpegTransferToDevice",
        )?,
        nvjpegDecodeJpegDevice: load_symbol(nvjpeg, "nvjpegDecodeJpegDevice")?,
    })
}

// ═══════════════════════════════════════════════════════════════════════════
//  LINK-TIME FALLBACK (non-Linux)
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(not(target_os = "linux"))]
mod linked {
    use super::*;

    extern "C" {
        pub fn cudaSetDevice(device: c_int) -> cudaError_t;
        pub fn cudaStreamCreateWithFlags(stream: *mut cudaStream_t, flags: c_uint) -> cudaError_t;
        pub fn cudaStreamDestroy(stream: cudaStream_t) -> cudaError_t;
        pub fn cudaStreamSynchronize(stream: cudaStream_t) -> cudaError_t;
        pub fn cudaMalloc(ptr: *mut *mut c_void, size: usize) -> cudaError_t;
        pub fn cudaFree(ptr: *mut c_void) -> cudaError_t;
        pub fn cudaMemcpy2D(
            dst: *mut c_void,
            dpitch: usize,
            src: *const c_void,
            spitch: usize,
            width: usize,
            height: usize,
            kind: c_int,
        ) -> cudaError_t;

        pub fn nvjpegCreateEx(
            backend: c_int,
            dev_allocator: *mut c_void,
            pinned_allocator: *mut c_void,
            flags: c_uint,
            handle: *mut nvjpegHandle_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegDestroy(handle: nvjpegHandle_t) -> nvjpegStatus_t;
        pub fn nvjpegGetImageInfo(
            handle: nvjpegHandle_t,
            data: *const u8,
            length: usize,
            n_components: *mut c_int,
            subsampling: *mut c_int,
            widths: *mut c_int,
            heights: *mut c_int,
        ) -> nvjpegStatus_t;
        pub fn nvjpegDecoderCreate(
            handle: nvjpegHandle_t,
            backend: c_int,
            decoder: *mut nvjpegJpegDecoder_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegDecoderDestroy(decoder: nvjpegJpegDecoder_t) -> nvjpegStatus_t;
        pub fn nvjpegDecoderStateCreate(
            handle: nvjpegHandle_t,
            decoder: nvjpegJpegDecoder_t,
            state: *mut nvjpegJpegState_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegJpegStateDestroy(state: nvjpegJpegState_t) -> nvjpegStatus_t;
        pub fn nvjpegBufferPinnedCreate(
            handle: nvjpegHandle_t,
            allocator: *mut c_void,
            buffer: *mut nvjpegBufferPinned_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegBufferPinnedDestroy(buffer: nvjpegBufferPinned_t) -> nvjpegStatus_t;
        pub fn nvjpegBufferDeviceCreate(
            handle: nvjpegHandle_t,
            allocator: *mut c_void,
            buffer: *mut nvjpegBufferDevice_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegBufferDeviceDestroy(buffer: nvjpegBufferDevice_t) -> nvjpegStatus_t;
        pub fn nvjpegJpegStreamCreate(
            handle: nvjpegHandle_t,
            stream: *mut nvjpegJpegStream_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegJpegStreamDestroy(stream: nvjpegJpegStream_t) -> nvjpegStatus_t;
        pub fn nvjpegJpegStreamParse(
            handle: nvjpegHandle_t,
            data: *const u8,
            length: usize,
            save_metadata: c_int,
            save_stream: c_int,
            stream: nvjpegJpegStream_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegStateAttachPinnedBuffer(
            state: nvjpegJpegState_t,
            buffer: nvjpegBufferPinned_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegStateAttachDeviceBuffer(
            state: nvjpegJpegState_t,
            buffer: nvjpegBufferDevice_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegDecodeParamsCreate(
            handle: nvjpegHandle_t,
            params: *mut nvjpegDecodeParams_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegDecodeParamsDestroy(params: nvjpegDecodeParams_t) -> nvjpegStatus_t;
        pub fn nvjpegDecodeParamsSetOutputFormat(
            params: nvjpegDecodeParams_t,
            format: c_int,
        ) -> nvjpegStatus_t;
        pub fn nvjpegDecodeParamsSetROI(
            params: nvjpegDecodeParams_t,
            offset_x: c_int,
            offset_y: c_int,
            roi_width: c_int,
            roi_height: c_int,
        ) -> nvjpegStatus_t;
        pub fn nvjpegDecodeJpegHost(
            handle: nvjpegHandle_t,
            decoder: nvjpegJpegDecoder_t,
            state: nvjpegJpegState_t,
            params: nvjpegDecodeParams_t,
            stream: nvjpegJpegStream_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegDecodeJpegTransferToDevice(
            handle: nvjpegHandle_t,
            decoder: nvjpegJpegDecoder_t,
            state: nvjpegJpegState_t,
            stream: nvjpegJpegStream_t,
            cuda_stream: cudaStream_t,
        ) -> nvjpegStatus_t;
        pub fn nvjpegDecodeJpegDevice(
            handle: nvjpegHandle_t,
            decoder: nvjpegJpegDecoder_t,
            state: nvjpegJpegState_t,
            destination: *mut nvjpegImage_t,
            cuda_stream: cudaStream_t,
        ) -> nvjpegStatus_t;
    }
}

#[cfg(not(target_os = "linux"))]
fn init_api() -> std::result::Result<Api, String> {
    Ok(Api {
        cudaSetDevice: linked::cudaSetDevice,
        cudaStreamCreateWithFlags: linked::cudaStreamCreateWithFlags,
        cudaStreamDestroy: linked::cudaStreamDestroy,
        cudaStreamSynchronize: linked::cudaStreamSynchronize,
        cudaMalloc: linked::cudaMalloc,
        cudaFree: linked::cudaFree,
        cudaMemcpy2D: linked::cudaMemcpy2D,
        nvjpegCreateEx: linked::nvjpegCreateEx,
        nvjpegDestroy: linked::nvjpegDestroy,
        nvjpegGetImageInfo: linked::nvjpegGetImageInfo,
        nvjpegDecoderCreate: linked::nvjpegDecoderCreate,
        nvjpegDecoderDestroy: linked::nvjpegDecoderDestroy,
        nvjpegDecoderStateCreate: linked::nvjpegDecoderStateCreate,
        nvjpegJpegStateDestroy: linked::nvjpegJpegStateDestroy,
        nvjpegBufferPinnedCreate: linked::nvjpegBufferPinnedCreate,
        nvjpegBufferPinnedDestroy: linked::nvjpegBufferPinnedDestroy,
        nvjpegBufferDeviceCreate: linked::nvjpegBufferDeviceCreate,
        nvjpegBufferDeviceDestroy: linked::nvjpegBufferDeviceDestroy,
        nvjpegJpegStreamCreate: linked::nvjpegJpegStreamCreate,
        nvjpegJpegStreamDestroy: linked::nvjpegJpegStreamDestroy,
        nvjpegJpegStreamParse: linked::nvjpegJpegStreamParse,
        nvjpegStateAttachPinnedBuffer: linked::nvjpegStateAttachPinnedBuffer,
        nvjpegStateAttachDeviceBuffer: linked::nvjpegStateAttachDeviceBuffer,
        nvjpegDecodeParamsCreate: linked::nvjpegDecodeParamsCreate,
        nvjpegDecodeParamsDestroy: linked::nvjpegDecodeParamsDestroy,
        nvjpegDecodeParamsSetOutputFormat: linked::nvjpegDecodeParamsSetOutputFormat,
        nvjpegDecodeParamsSetROI: linked::nvjpegDecodeParamsSetROI,
        nvjpegDecodeJpegHost: linked::nvjpegDecodeJpegHost,
        nvjpegDecodeJpegTransferToDevice: linked::nvjpegDecodeJpegTransferToDevice,
        nvjpegDecodeJpegDevice: linked::nvjpegDecodeJpegDevice,
    })
}
