//! Per-thread decoupled decode session.

use std::ptr;
use std::sync::Arc;

use nvjet_core::codec_traits::DecodeSession;
use nvjet_core::error::{EngineError, Result};
use nvjet_core::ffi_types::cudaStream_t;
use nvjet_core::types::{Backend, DeviceImage, OutputFormat, Roi, PIPELINE_STAGES};

use crate::handle::NvjpegHandle;
use crate::sys::{self, check_cuda, check_nvjpeg, Api};

/// One worker thread's decoder resources.
///
/// Owns a non-blocking CUDA stream, a decoder/state pair for each backend,
/// a shared device working buffer, and [`PIPELINE_STAGES`] rotating
/// {pinned buffer, bitstream-parse handle} sets.  All decode work is
/// enqueued on the session's stream; nothing here blocks except
/// [`DecodeSession::synchronize`].
///
/// Resources are acquired in dependency order and released in strict
/// reverse order on drop.  Fields start as null so a failure partway
/// through construction releases exactly what was acquired.
pub struct NvjpegSession {
    api: &'static Api,
    // Keeps the library handle alive for as long as any session exists.
    handle: Arc<NvjpegHandle>,
    backend: Backend,
    stream: cudaStream_t,
    dec_cpu: sys::nvjpegJpegDecoder_t,
    dec_gpu: sys::nvjpegJpegDecoder_t,
    state_cpu: sys::nvjpegJpegState_t,
    state_gpu: sys::nvjpegJpegState_t,
    device_buffer: sys::nvjpegBufferDevice_t,
    pinned_buffers: [sys::nvjpegBufferPinned_t; PIPELINE_STAGES],
    jpeg_streams: [sys::nvjpegJpegStream_t; PIPELINE_STAGES],
    params: sys::nvjpegDecodeParams_t,
}

// SAFETY: the session is used by exactly one worker thread at a time;
// the raw handles it owns are not tied to the creating thread.
unsafe impl Send for NvjpegSession {}

impl NvjpegSession {
    /// Create a session bound to `device`, decoding into `format` using
    /// the given backend's decoder.
    pub fn new(
        handle: Arc<NvjpegHandle>,
        device: i32,
        format: OutputFormat,
        backend: Backend,
    ) -> Result<Self> {
        let api = handle.api();
        let mut session = Self {
            api,
            handle,
            backend,
            stream: ptr::null_mut(),
            dec_cpu: ptr::null_mut(),
            dec_gpu: ptr::null_mut(),
            state_cpu: ptr::null_mut(),
            state_gpu: ptr::null_mut(),
            device_buffer: ptr::null_mut(),
            pinned_buffers: [ptr::null_mut(); PIPELINE_STAGES],
            jpeg_streams: [ptr::null_mut(); PIPELINE_STAGES],
            params: ptr::null_mut(),
        };
        session.init(device, format)?;
        Ok(session)
    }

    fn init(&mut self, device: i32, format: OutputFormat) -> Result<()> {
        let raw = self.handle.raw();
        // SAFETY: each call writes through a valid out-pointer; `raw` is a
        // live nvJPEG handle.  Any failure leaves later fields null and
        // Drop releases only what was acquired.
        unsafe {
            check_cuda((self.api.cudaSetDevice)(device), "cudaSetDevice")?;
            check_cuda(
                (self.api.cudaStreamCreateWithFlags)(&mut self.stream, sys::cudaStreamNonBlocking),
                "cudaStreamCreateWithFlags",
            )?;
            check_nvjpeg(
                (self.api.nvjpegDecoderCreate)(raw, sys::NVJPEG_BACKEND_HYBRID, &mut self.dec_cpu),
                "nvjpegDecoderCreate",
            )?;
            check_nvjpeg(
                (self.api.nvjpegDecoderCreate)(
                    raw,
                    sys::NVJPEG_BACKEND_GPU_HYBRID,
                    &mut self.dec_gpu,
                ),
                "nvjpegDecoderCreate",
            )?;
            check_nvjpeg(
                (self.api.nvjpegDecoderStateCreate)(raw, self.dec_cpu, &mut self.state_cpu),
                "nvjpegDecoderStateCreate",
            )?;
            check_nvjpeg(
                (self.api.nvjpegDecoderStateCreate)(raw, self.dec_gpu, &mut self.state_gpu),
                "nvjpegDecoderStateCreate",
            )?;
            check_nvjpeg(
                (self.api.nvjpegBufferDeviceCreate)(
                    raw,
                    ptr::null_mut(),
                    &mut self.device_buffer,
                ),
                "nvjpegBufferDeviceCreate",
            )?;
            for stage in 0..PIPELINE_STAGES {
                check_nvjpeg(
                    (self.api.nvjpegBufferPinnedCreate)(
                        raw,
                        ptr::null_mut(),
                        &mut self.pinned_buffers[stage],
                    ),
                    "nvjpegBufferPinnedCreate",
                )?;
                check_nvjpeg(
                    (self.api.nvjpegJpegStreamCreate)(raw, &mut self.jpeg_streams[stage]),
                    "nvjpegJpegStreamCreate",
                )?;
            }
            // Both states share the single device working buffer; only one
            // backend decodes at a time within a session.
            check_nvjpeg(
                (self.api.nvjpegStateAttachDeviceBuffer)(self.state_cpu, self.device_buffer),
                "nvjpegStateAttachDeviceBuffer",
            )?;
            check_nvjpeg(
                (self.api.nvjpegStateAttachDeviceBuffer)(self.state_gpu, self.device_buffer),
                "nvjpegStateAttachDeviceBuffer",
            )?;
            check_nvjpeg(
                (self.api.nvjpegDecodeParamsCreate)(raw, &mut self.params),
                "nvjpegDecodeParamsCreate",
            )?;
            check_nvjpeg(
                (self.api.nvjpegDecodeParamsSetOutputFormat)(self.params, format as i32),
                "nvjpegDecodeParamsSetOutputFormat",
            )?;
        }
        tracing::debug!(device, backend = ?self.backend, "decode session ready");
        Ok(())
    }

    fn active_decoder(&self) -> sys::nvjpegJpegDecoder_t {
        match self.backend {
            Backend::Hybrid => self.dec_cpu,
            Backend::GpuHybrid => self.dec_gpu,
        }
    }

    fn active_state(&self) -> sys::nvjpegJpegState_t {
        match self.backend {
            Backend::Hybrid => self.state_cpu,
            Backend::GpuHybrid => self.state_gpu,
        }
    }

    fn check_stage(&self, stage: usize) -> Result<()> {
        if stage < PIPELINE_STAGES {
            Ok(())
        } else {
            Err(EngineError::InvariantViolation(format!(
                "stage index {stage} out of range for {PIPELINE_STAGES} pipeline stages"
            )))
        }
    }
}

impl DecodeSession for NvjpegSession {
    fn stages(&self) -> usize {
        PIPELINE_STAGES
    }

    fn parse_header(&mut self, stage: usize, data: &[u8]) -> Result<()> {
        self.check_stage(stage)?;
        // SAFETY: data slice valid for the call, stage handle live.
        let status = unsafe {
            (self.api.nvjpegJpegStreamParse)(
                self.handle.raw(),
                data.as_ptr(),
                data.len(),
                0,
                0,
                self.jpeg_streams[stage],
            )
        };
        if status != nvjet_core::ffi_types::NVJPEG_STATUS_SUCCESS {
            return Err(EngineError::HeaderParse {
                call: "nvjpegJpegStreamParse",
                code: status,
            });
        }
        Ok(())
    }

    fn submit_decode(
        &mut self,
        stage: usize,
        output: &DeviceImage,
        roi: Option<Roi>,
    ) -> Result<()> {
        self.check_stage(stage)?;
        let raw = self.handle.raw();
        let decoder = self.active_decoder();
        let state = self.active_state();

        let mut destination = sys::nvjpegImage_t::default();
        for c in 0..sys::NVJPEG_MAX_COMPONENT {
            destination.channel[c] = output.channel[c] as usize as *mut u8;
            destination.pitch[c] = output.pitch[c];
        }

        // SAFETY: all handles live; `destination` plane pointers come from
        // allocations the caller keeps alive past synchronization.
        unsafe {
            check_nvjpeg(
                (self.api.nvjpegStateAttachPinnedBuffer)(state, self.pinned_buffers[stage]),
                "nvjpegStateAttachPinnedBuffer",
            )?;
            match roi {
                Some(roi) => check_nvjpeg(
                    (self.api.nvjpegDecodeParamsSetROI)(
                        self.params,
                        roi.x as i32,
                        roi.y as i32,
                        roi.width as i32,
                        roi.height as i32,
                    ),
                    "nvjpegDecodeParamsSetROI",
                )?,
                // Width/height of -1 resets any region from a prior image.
                None => check_nvjpeg(
                    (self.api.nvjpegDecodeParamsSetROI)(self.params, 0, 0, -1, -1),
                    "nvjpegDecodeParamsSetROI",
                )?,
            }
            check_nvjpeg(
                (self.api.nvjpegDecodeJpegHost)(
                    raw,
                    decoder,
                    state,
                    self.params,
                    self.jpeg_streams[stage],
                ),
                "nvjpegDecodeJpegHost",
            )?;
            check_nvjpeg(
                (self.api.nvjpegDecodeJpegTransferToDevice)(
                    raw,
                    decoder,
                    state,
                    self.jpeg_streams[stage],
                    self.stream,
                ),
                "nvjpegDecodeJpegTransferToDevice",
            )?;
            check_nvjpeg(
                (self.api.nvjpegDecodeJpegDevice)(
                    raw,
                    decoder,
                    state,
                    &mut destination,
                    self.stream,
                ),
                "nvjpegDecodeJpegDevice",
            )?;
        }
        Ok(())
    }

    fn synchronize(&mut self) -> Result<()> {
        // SAFETY: stream is live for the session's lifetime.
        check_cuda(
            unsafe { (self.api.cudaStreamSynchronize)(self.stream) },
            "cudaStreamSynchronize",
        )
    }
}

impl Drop for NvjpegSession {
    fn drop(&mut self) {
        // SAFETY: reverse acquisition order; null fields were never
        // acquired and are skipped.
        unsafe {
            if !self.params.is_null() {
                (self.api.nvjpegDecodeParamsDestroy)(self.params);
            }
            for stage in (0..PIPELINE_STAGES).rev() {
                if !self.jpeg_streams[stage].is_null() {
                    (self.api.nvjpegJpegStreamDestroy)(self.jpeg_streams[stage]);
                }
                if !self.pinned_buffers[stage].is_null() {
                    (self.api.nvjpegBufferPinnedDestroy)(self.pinned_buffers[stage]);
                }
            }
            if !self.device_buffer.is_null() {
                (self.api.nvjpegBufferDeviceDestroy)(self.device_buffer);
            }
            if !self.state_gpu.is_null() {
                (self.api.nvjpegJpegStateDestroy)(self.state_gpu);
            }
            if !self.state_cpu.is_null() {
                (self.api.nvjpegJpegStateDestroy)(self.state_cpu);
            }
            if !self.dec_gpu.is_null() {
                (self.api.nvjpegDecoderDestroy)(self.dec_gpu);
            }
            if !self.dec_cpu.is_null() {
                (self.api.nvjpegDecoderDestroy)(self.dec_cpu);
            }
            if !self.stream.is_null() {
                (self.api.cudaStreamDestroy)(self.stream);
            }
        }
    }
}
