//! Grow-only device output buffers, one slot per batch index.

use nvjet_core::codec_traits::{DevicePlane, PlaneAllocator};
use nvjet_core::error::{EngineError, Result};
use nvjet_core::types::{DeviceImage, ImageInfo, OutputFormat, Roi, MAX_COMPONENTS};

/// One device plane with its tracked capacity and current row pitch.
struct PlaneBuffer<P: DevicePlane> {
    plane: Option<P>,
    pitch: usize,
}

impl<P: DevicePlane> PlaneBuffer<P> {
    fn empty() -> Self {
        Self {
            plane: None,
            pitch: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.plane.as_ref().map_or(0, DevicePlane::len)
    }

    /// Size the plane for `pitch`-byte rows over `rows` rows.
    ///
    /// The pitch is refreshed unconditionally: the same allocation is
    /// reused across differently shaped images below its capacity
    /// ceiling.  Reallocation happens only for a strictly larger
    /// requirement, and frees the old plane before allocating.
    fn ensure<A: PlaneAllocator<Plane = P>>(
        &mut self,
        allocator: &A,
        pitch: usize,
        rows: usize,
    ) -> Result<()> {
        self.pitch = pitch;
        let required = pitch * rows;
        if required > self.capacity() {
            drop(self.plane.take());
            self.plane = Some(allocator.alloc_plane(required)?);
        }
        Ok(())
    }
}

struct OutputSlot<P: DevicePlane> {
    planes: [PlaneBuffer<P>; MAX_COMPONENTS],
}

impl<P: DevicePlane> OutputSlot<P> {
    fn empty() -> Self {
        Self {
            planes: std::array::from_fn(|_| PlaneBuffer::empty()),
        }
    }
}

/// Effective output geometry for one prepared slot.
///
/// `roi` is present only when the region is active for this image, and
/// is exactly the region the decode must be submitted with so buffer
/// sizing and decode parameters stay in agreement.
#[derive(Clone, Copy, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub roi: Option<Roi>,
}

/// Sizes per-slot device planes for the active output format, keeping
/// every plane's capacity monotonically non-decreasing across batches.
pub struct OutputBufferManager<A: PlaneAllocator> {
    allocator: A,
    format: OutputFormat,
    roi: Option<Roi>,
    slots: Vec<OutputSlot<A::Plane>>,
}

impl<A: PlaneAllocator> OutputBufferManager<A> {
    pub fn new(allocator: A, format: OutputFormat, roi: Option<Roi>, batch_size: usize) -> Self {
        Self {
            allocator,
            format,
            roi,
            slots: (0..batch_size).map(|_| OutputSlot::empty()).collect(),
        }
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// (Re)size slot `slot` for one image, returning its effective
    /// output geometry.
    ///
    /// A requested ROI is substituted for the native dimensions only
    /// when the source strictly exceeds offset+extent in both axes, and
    /// only for the RGB/BGR output formats; native-layout formats keep
    /// per-component chroma dimensions unchanged.
    pub fn prepare(&mut self, slot: usize, info: &ImageInfo) -> Result<PreparedImage> {
        if slot >= self.slots.len() {
            return Err(EngineError::InvariantViolation(format!(
                "output slot {slot} out of range for batch size {}",
                self.slots.len()
            )));
        }

        let mut width = info.width();
        let mut height = info.height();
        let roi = match self.format {
            OutputFormat::Rgb | OutputFormat::Bgr | OutputFormat::Rgbi | OutputFormat::Bgri => {
                self.roi.filter(|r| r.applies_to(width, height))
            }
            _ => None,
        };
        if let Some(roi) = roi {
            width = roi.width;
            height = roi.height;
        }

        let planes = &mut self.slots[slot].planes;
        match self.format {
            OutputFormat::Rgbi | OutputFormat::Bgri => {
                planes[0].ensure(&self.allocator, width as usize * 3, height as usize)?;
            }
            OutputFormat::Rgb | OutputFormat::Bgr => {
                for plane in planes.iter_mut().take(3) {
                    plane.ensure(&self.allocator, width as usize, height as usize)?;
                }
            }
            OutputFormat::Y => {
                planes[0].ensure(&self.allocator, width as usize, height as usize)?;
            }
            OutputFormat::Yuv | OutputFormat::Unchanged => {
                for (c, plane) in planes
                    .iter_mut()
                    .enumerate()
                    .take(info.channels.min(MAX_COMPONENTS))
                {
                    plane.ensure(
                        &self.allocator,
                        info.widths[c] as usize,
                        info.heights[c] as usize,
                    )?;
                }
            }
        }

        Ok(PreparedImage { width, height, roi })
    }

    /// Plane pointers and pitches for slot `slot`, shaped for decode
    /// submission.  Valid only while the slot's allocations are alive.
    pub fn device_image(&self, slot: usize) -> DeviceImage {
        let mut image = DeviceImage::default();
        for (c, plane) in self.slots[slot].planes.iter().enumerate() {
            if let Some(p) = &plane.plane {
                image.channel[c] = p.device_ptr();
                image.pitch[c] = plane.pitch;
            }
        }
        image
    }

    #[cfg(test)]
    fn plane_capacity(&self, slot: usize, component: usize) -> usize {
        self.slots[slot].planes[component].capacity()
    }

    #[cfg(test)]
    fn plane_pitch(&self, slot: usize, component: usize) -> usize {
        self.slots[slot].planes[component].pitch
    }
}
