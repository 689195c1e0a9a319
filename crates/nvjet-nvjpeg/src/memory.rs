//! Device memory allocation and device→host readback.

use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nvjet_core::codec_traits::{DevicePlane, HostTransfer, PlaneAllocator};
use nvjet_core::error::{EngineError, Result};
use nvjet_core::ffi_types::DevicePtr;
use nvjet_core::types::DeviceImage;

use crate::sys::{self, check_cuda, Api};

/// Running totals of device memory held through [`CudaAllocator`].
///
/// `current` tracks live bytes, `peak` the high-water mark.  Shared by
/// the allocator and every plane it hands out so frees are observed no
/// matter where the plane is dropped.
#[derive(Debug, Default)]
pub struct VramAccounting {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl VramAccounting {
    fn record_alloc(&self, bytes: usize) {
        let now = self.current.fetch_add(bytes, Ordering::Relaxed) + bytes;
        self.peak.fetch_max(now, Ordering::Relaxed);
    }

    fn record_free(&self, bytes: usize) {
        self.current.fetch_sub(bytes, Ordering::Relaxed);
    }

    pub fn current_bytes(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    pub fn peak_bytes(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }
}

/// One `cudaMalloc` allocation backing a pixel plane.
pub struct CudaPlane {
    api: &'static Api,
    ptr: DevicePtr,
    len: usize,
    accounting: Arc<VramAccounting>,
}

// SAFETY: the device pointer is an opaque address; all dereferencing
// happens on the device via CUDA calls.
unsafe impl Send for CudaPlane {}

impl DevicePlane for CudaPlane {
    fn device_ptr(&self) -> DevicePtr {
        self.ptr
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl Drop for CudaPlane {
    fn drop(&mut self) {
        if self.ptr != 0 {
            // SAFETY: ptr came from cudaMalloc and is freed exactly once.
            unsafe { (self.api.cudaFree)(self.ptr as usize as *mut c_void) };
            self.accounting.record_free(self.len);
        }
    }
}

/// Plane allocator and readback path over the CUDA runtime.
pub struct CudaAllocator {
    api: &'static Api,
    accounting: Arc<VramAccounting>,
}

impl CudaAllocator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: Api::get()?,
            accounting: Arc::new(VramAccounting::default()),
        })
    }

    pub fn accounting(&self) -> &VramAccounting {
        &self.accounting
    }
}

impl PlaneAllocator for CudaAllocator {
    type Plane = CudaPlane;

    fn alloc_plane(&self, bytes: usize) -> Result<CudaPlane> {
        let mut raw: *mut c_void = ptr::null_mut();
        // SAFETY: out-pointer is valid for the call.
        check_cuda(unsafe { (self.api.cudaMalloc)(&mut raw, bytes) }, "cudaMalloc")?;
        self.accounting.record_alloc(bytes);
        tracing::debug!(
            bytes,
            current = self.accounting.current_bytes(),
            peak = self.accounting.peak_bytes(),
            "device plane allocated"
        );
        Ok(CudaPlane {
            api: self.api,
            ptr: raw as usize as DevicePtr,
            len: bytes,
            accounting: Arc::clone(&self.accounting),
        })
    }
}

impl HostTransfer for CudaAllocator {
    fn read_plane(
        &self,
        image: &DeviceImage,
        component: usize,
        row_bytes: usize,
        rows: usize,
    ) -> Result<Vec<u8>> {
        let pitch = image.pitch[component];
        if pitch < row_bytes {
            return Err(EngineError::InvariantViolation(format!(
                "plane {component} pitch {pitch} is smaller than its row width {row_bytes}"
            )));
        }
        let mut host = vec![0u8; row_bytes * rows];
        // SAFETY: destination is `row_bytes * rows` bytes with pitch
        // `row_bytes`; source plane spans at least `pitch * rows` bytes.
        check_cuda(
            unsafe {
                (self.api.cudaMemcpy2D)(
                    host.as_mut_ptr() as *mut c_void,
                    row_bytes,
                    image.channel[component] as usize as *const c_void,
                    pitch,
                    row_bytes,
                    rows,
                    sys::cudaMemcpyDeviceToHost,
                )
            },
            "cudaMemcpy2D",
        )?;
        Ok(host)
    }
}
