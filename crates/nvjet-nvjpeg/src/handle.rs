//! Process-wide nvJPEG library handle.

use std::os::raw::c_int;
use std::ptr;

use nvjet_core::codec_traits::ImageProbe;
use nvjet_core::error::{EngineError, Result};
use nvjet_core::types::{ChromaSubsampling, ImageInfo, MAX_COMPONENTS};

use crate::sys::{self, check_nvjpeg, Api};

/// Owned `nvjpegHandle_t`.
///
/// One handle is shared by every decoder session and probe in the
/// process; nvJPEG handles are thread-safe by contract.  Creating the
/// handle is also the first point where the CUDA/nvJPEG libraries are
/// resolved, so construction fails with [`EngineError::DriverLoad`] on
/// hosts without a CUDA stack.
pub struct NvjpegHandle {
    api: &'static Api,
    raw: sys::nvjpegHandle_t,
}

// SAFETY: nvjpegHandle_t is documented thread-safe; the raw pointer is
// only ever passed back into nvJPEG entry points.
unsafe impl Send for NvjpegHandle {}
unsafe impl Sync for NvjpegHandle {}

impl NvjpegHandle {
    pub fn new() -> Result<Self> {
        let api = Api::get()?;
        let mut raw: sys::nvjpegHandle_t = ptr::null_mut();
        // SAFETY: out-pointer is valid; default backend, no custom allocators.
        check_nvjpeg(
            unsafe {
                (api.nvjpegCreateEx)(
                    sys::NVJPEG_BACKEND_DEFAULT,
                    ptr::null_mut(),
                    ptr::null_mut(),
                    0,
                    &mut raw,
                )
            },
            "nvjpegCreateEx",
        )?;
        tracing::debug!("nvJPEG library handle created");
        Ok(Self { api, raw })
    }

    pub(crate) fn api(&self) -> &'static Api {
        self.api
    }

    pub(crate) fn raw(&self) -> sys::nvjpegHandle_t {
        self.raw
    }
}

impl Drop for NvjpegHandle {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            // SAFETY: raw was produced by nvjpegCreateEx and is destroyed once.
            unsafe { (self.api.nvjpegDestroy)(self.raw) };
        }
    }
}

fn subsampling_from_raw(raw: c_int) -> ChromaSubsampling {
    match raw {
        sys::NVJPEG_CSS_444 => ChromaSubsampling::Css444,
        sys::NVJPEG_CSS_422 => ChromaSubsampling::Css422,
        sys::NVJPEG_CSS_420 => ChromaSubsampling::Css420,
        sys::NVJPEG_CSS_440 => ChromaSubsampling::Css440,
        sys::NVJPEG_CSS_411 => ChromaSubsampling::Css411,
        sys::NVJPEG_CSS_410 => ChromaSubsampling::Css410,
        sys::NVJPEG_CSS_GRAY => ChromaSubsampling::Gray,
        _ => ChromaSubsampling::Unknown,
    }
}

impl ImageProbe for NvjpegHandle {
    fn image_info(&self, data: &[u8]) -> Result<ImageInfo> {
        let mut channels: c_int = 0;
        let mut subsampling: c_int = sys::NVJPEG_CSS_UNKNOWN;
        let mut widths = [0 as c_int; MAX_COMPONENTS];
        let mut heights = [0 as c_int; MAX_COMPONENTS];

        // SAFETY: buffers sized to NVJPEG_MAX_COMPONENT, data slice valid
        // for the call's duration.
        let status = unsafe {
            (self.api.nvjpegGetImageInfo)(
                self.raw,
                data.as_ptr(),
                data.len(),
                &mut channels,
                &mut subsampling,
                widths.as_mut_ptr(),
                heights.as_mut_ptr(),
            )
        };
        if status != nvjet_core::ffi_types::NVJPEG_STATUS_SUCCESS {
            return Err(EngineError::HeaderParse {
                call: "nvjpegGetImageInfo",
                code: status,
            });
        }

        let subsampling = subsampling_from_raw(subsampling);
        if subsampling == ChromaSubsampling::Unknown {
            return Err(EngineError::UnsupportedSubsampling);
        }

        let mut info = ImageInfo {
            channels: channels.max(0) as usize,
            widths: [0; MAX_COMPONENTS],
            heights: [0; MAX_COMPONENTS],
            subsampling,
        };
        for c in 0..info.channels.min(MAX_COMPONENTS) {
            info.widths[c] = widths[c].max(0) as u32;
            info.heights[c] = heights[c].max(0) as u32;
        }
        Ok(info)
    }
}
