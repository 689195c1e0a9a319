//! Value types shared by the pipeline and the nvJPEG binding.

use std::fmt;

use crate::ffi_types::DevicePtr;

/// Maximum number of pixel planes per image (NVJPEG_MAX_COMPONENT).
pub const MAX_COMPONENTS: usize = 4;

/// Number of rotating {pinned buffer, bitstream-parse handle} stage sets
/// per decoder session.
///
/// At least two stages are required so the host can parse the next
/// image's bitstream while the device still consumes the previous one;
/// with a single stage the pipeline would serialize and reuse a slot
/// while its asynchronous work is still in flight.
pub const PIPELINE_STAGES: usize = 2;

const _: () = assert!(
    PIPELINE_STAGES >= 2,
    "pipeline depth below 2 cannot overlap host parse with device decode"
);

/// Target output pixel format, mirroring `nvjpegOutputFormat_t`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum OutputFormat {
    /// Native per-component planes, no color conversion.
    Unchanged = 0,
    /// Planar YUV at the source's chroma dimensions.
    Yuv = 1,
    /// Luma plane only.
    Y = 2,
    /// Three equal-sized planar RGB planes.
    Rgb = 3,
    /// Three equal-sized planar BGR planes.
    Bgr = 4,
    /// Single interleaved plane, 3 samples packed per pixel.
    Rgbi = 5,
    /// Single interleaved plane, B-G-R sample order.
    Bgri = 6,
}

impl OutputFormat {
    /// Whether this format packs all samples into one interleaved plane.
    pub fn is_interleaved(self) -> bool {
        matches!(self, Self::Rgbi | Self::Bgri)
    }
}

/// Chroma subsampling class of a source JPEG, mirroring
/// `nvjpegChromaSubsampling_t`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChromaSubsampling {
    Css444,
    Css422,
    Css420,
    Css440,
    Css411,
    Css410,
    Gray,
    Unknown,
}

impl fmt::Display for ChromaSubsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Css444 => "YUV 4:4:4 chroma subsampling",
            Self::Css422 => "YUV 4:2:2 chroma subsampling",
            Self::Css420 => "YUV 4:2:0 chroma subsampling",
            Self::Css440 => "YUV 4:4:0 chroma subsampling",
            Self::Css411 => "YUV 4:1:1 chroma subsampling",
            Self::Css410 => "YUV 4:1:0 chroma subsampling",
            Self::Gray => "grayscale JPEG",
            Self::Unknown => "unknown chroma subsampling",
        };
        f.write_str(s)
    }
}

/// Per-image metadata from a header-only parse.
///
/// Ephemeral: recomputed for every image in every batch purely to size
/// output buffers, never persisted.
#[derive(Clone, Copy, Debug)]
pub struct ImageInfo {
    /// Number of components in the source bitstream.
    pub channels: usize,
    /// Per-component widths; entries past `channels` are zero.
    pub widths: [u32; MAX_COMPONENTS],
    /// Per-component heights; entries past `channels` are zero.
    pub heights: [u32; MAX_COMPONENTS],
    pub subsampling: ChromaSubsampling,
}

impl ImageInfo {
    /// Luma-plane width (the image's nominal width).
    pub fn width(&self) -> u32 {
        self.widths[0]
    }

    /// Luma-plane height (the image's nominal height).
    pub fn height(&self) -> u32 {
        self.heights[0]
    }
}

/// Region of interest in source-image pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    /// Whether this ROI is active for an image of the given dimensions.
    ///
    /// The region applies only when the source is strictly larger than
    /// offset+extent in BOTH axes; otherwise the full image is decoded
    /// and the ROI is silently ignored.
    pub fn applies_to(&self, image_width: u32, image_height: u32) -> bool {
        image_width > self.x + self.width && image_height > self.y + self.height
    }
}

/// Which host/device work split the decoder uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Backend {
    /// Huffman/entropy parsing on the host, IDCT and color pipeline on
    /// the device (NVJPEG_BACKEND_HYBRID).
    #[default]
    Hybrid,
    /// Entire decode on the device (NVJPEG_BACKEND_GPU_HYBRID).
    GpuHybrid,
}

/// Device-resident output image view, shaped like `nvjpegImage_t`:
/// up to [`MAX_COMPONENTS`] plane pointers with their row pitches.
///
/// The pointers are borrowed from an output buffer manager slot; the view
/// is only valid while that slot's allocations are alive.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeviceImage {
    pub channel: [DevicePtr; MAX_COMPONENTS],
    pub pitch: [usize; MAX_COMPONENTS],
}
