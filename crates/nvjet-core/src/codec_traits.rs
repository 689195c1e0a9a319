//! Shared codec traits used across crate boundaries.
//!
//! These traits break the dependency cycle between `nvjet-nvjpeg` and
//! `nvjet-pipeline` by providing a neutral home, and they are the seams
//! where tests substitute recording mocks for the real GPU backend.

use crate::error::Result;
use crate::ffi_types::DevicePtr;
use crate::types::{DeviceImage, ImageInfo, Roi};

// ─── Header inspection ───────────────────────────────────────────────────

/// Header-only probe of an encoded JPEG buffer.
///
/// Implementations must not trigger a full pixel decode: this runs on
/// every image in every batch purely for output-buffer sizing.
pub trait ImageProbe: Sync {
    /// Component count, per-component dimensions, and subsampling class,
    /// or a per-file recoverable error when the headers cannot be parsed.
    fn image_info(&self, data: &[u8]) -> Result<ImageInfo>;
}

// ─── Device memory ───────────────────────────────────────────────────────

/// One owned device allocation backing a pixel plane.
///
/// Dropping the plane releases the device memory.
pub trait DevicePlane: Send {
    fn device_ptr(&self) -> DevicePtr;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Allocates device memory for pixel planes.
///
/// The output buffer manager calls this only when a strictly larger plane
/// is required; freeing happens by dropping the previous plane.
pub trait PlaneAllocator {
    type Plane: DevicePlane;
    fn alloc_plane(&self, bytes: usize) -> Result<Self::Plane>;
}

/// Device→host readback of one plane from a decoded output image.
///
/// Used by the disk dump path after end-of-batch stream synchronization;
/// never called while asynchronous decode work may still be in flight.
pub trait HostTransfer {
    /// Copy `rows` rows of `row_bytes` valid bytes each from plane
    /// `component` of `image`, compacting out the device pitch.
    fn read_plane(
        &self,
        image: &DeviceImage,
        component: usize,
        row_bytes: usize,
        rows: usize,
    ) -> Result<Vec<u8>>;
}

// ─── Decode session ──────────────────────────────────────────────────────

/// One thread's decoder resources behind the rotating pipeline stages.
///
/// The real implementation owns a non-blocking CUDA stream, a pair of
/// nvJPEG decoder backends with their states, a shared device working
/// buffer, and `stages()` rotating {pinned buffer, bitstream-parse
/// handle} sets.  The pipeline's decoder context layers the ping-pong
/// discipline on top and never lets a stage slot be reused while its
/// previously enqueued work is unsynchronized.
///
/// Decode submission is asynchronous with respect to the calling thread:
/// `submit_decode` enqueues work on the session's stream and returns.
/// Only `synchronize` blocks.
pub trait DecodeSession: Send {
    /// Number of rotating stage slots (pipeline depth `P`).
    fn stages(&self) -> usize;

    /// Parse the bitstream header into stage `stage`'s parse handle.
    fn parse_header(&mut self, stage: usize, data: &[u8]) -> Result<()>;

    /// Enqueue the decode of the previously parsed bitstream in stage
    /// `stage`, writing pixels into `output`.  `roi`, when present, is
    /// already clipped against the source dimensions by the caller.
    fn submit_decode(
        &mut self,
        stage: usize,
        output: &DeviceImage,
        roi: Option<Roi>,
    ) -> Result<()>;

    /// Block until all work enqueued on the session's stream completes.
    fn synchronize(&mut self) -> Result<()>;
}
