//! Multi-threaded batch orchestration.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use nvjet_core::codec_traits::{DecodeSession, HostTransfer, ImageProbe, PlaneAllocator};
use nvjet_core::error::{EngineError, Result};
use nvjet_core::types::{OutputFormat, Roi};

use crate::batch::{BatchReader, EncodedImage};
use crate::bmp;
use crate::context::DecoderContext;
use crate::output::{OutputBufferManager, PreparedImage};

/// Parameters of one decode run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub batch_size: usize,
    pub total_images: usize,
    pub warmup_batches: usize,
    pub threads: usize,
    pub format: OutputFormat,
    pub roi: Option<Roi>,
    /// When set, decoded images are synchronized and dumped as BMP here.
    pub output_dir: Option<PathBuf>,
}

/// Measured-run results, aggregated over all worker threads.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub images_decoded: usize,
    /// Wall time of the slowest worker's measured run.
    pub elapsed: Duration,
    pub images_per_sec: f64,
}

/// Drive the full run: split the file list into disjoint per-thread
/// ranges, spawn one worker per range, each bound to its own session and
/// allocator for its whole lifetime, and aggregate the measured results.
///
/// `total_images` is rounded up to a whole number of batches per thread.
/// Warm-up batches are decoded and discarded before timing starts so
/// first-use allocations converge outside the measurement window.
pub fn run<S, A, P, FS, FA>(
    config: &RunConfig,
    files: Vec<PathBuf>,
    probe: &P,
    make_session: FS,
    make_allocator: FA,
) -> Result<RunSummary>
where
    S: DecodeSession,
    A: PlaneAllocator + HostTransfer,
    P: ImageProbe,
    FS: Fn(usize) -> Result<S> + Sync,
    FA: Fn(usize) -> Result<A> + Sync,
{
    if config.batch_size == 0 {
        return Err(EngineError::Config("batch size must be positive".into()));
    }
    if config.threads == 0 {
        return Err(EngineError::Config("thread count must be positive".into()));
    }
    if config.total_images == 0 {
        return Err(EngineError::Config("total image count must be positive".into()));
    }
    if files.is_empty() {
        return Err(EngineError::Config("no input files found".into()));
    }

    let threads = config.threads.min(files.len());
    if threads < config.threads {
        tracing::warn!(
            requested = config.threads,
            effective = threads,
            "fewer input files than threads, reducing thread count"
        );
    }

    let images_per_thread = config.total_images.div_ceil(threads);
    let batches_per_thread = images_per_thread.div_ceil(config.batch_size);
    let chunks = split_files(files, threads);

    tracing::info!(
        threads,
        batches_per_thread,
        batch_size = config.batch_size,
        warmup = config.warmup_batches,
        "starting decode run"
    );

    let results: Vec<Result<(usize, Duration)>> = std::thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .into_iter()
            .enumerate()
            .map(|(thread_index, chunk)| {
                let make_session = &make_session;
                let make_allocator = &make_allocator;
                scope.spawn(move || {
                    worker(
                        thread_index,
                        config,
                        batches_per_thread,
                        chunk,
                        probe,
                        make_session(thread_index)?,
                        make_allocator(thread_index)?,
                    )
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| EngineError::Pipeline("worker thread panicked".into()))?
            })
            .collect()
    });

    let mut images_decoded = 0;
    let mut elapsed = Duration::ZERO;
    for result in results {
        let (decoded, thread_elapsed) = result?;
        images_decoded += decoded;
        elapsed = elapsed.max(thread_elapsed);
    }

    let images_per_sec = if elapsed.is_zero() {
        0.0
    } else {
        images_decoded as f64 / elapsed.as_secs_f64()
    };
    let avg_ms_per_image = elapsed.as_secs_f64() * 1e3 / images_decoded.max(1) as f64;
    tracing::info!(
        images_decoded,
        elapsed_ms = elapsed.as_millis() as u64,
        images_per_sec,
        avg_ms_per_image,
        "decode run complete"
    );

    Ok(RunSummary {
        images_decoded,
        elapsed,
        images_per_sec,
    })
}

/// Split `files` into exactly `threads` non-empty contiguous ranges.
///
/// The per-thread image quota assumes one worker per range, so the
/// range count must equal the thread count; a shorter split would
/// silently under-deliver the requested total.
fn split_files(files: Vec<PathBuf>, threads: usize) -> Vec<Vec<PathBuf>> {
    let base = files.len() / threads;
    let extra = files.len() % threads;
    let mut iter = files.into_iter();
    (0..threads)
        .map(|t| iter.by_ref().take(base + usize::from(t < extra)).collect())
        .collect()
}

fn worker<S, A, P>(
    thread_index: usize,
    config: &RunConfig,
    batches: usize,
    files: Vec<PathBuf>,
    probe: &P,
    session: S,
    allocator: A,
) -> Result<(usize, Duration)>
where
    S: DecodeSession,
    A: PlaneAllocator + HostTransfer,
    P: ImageProbe,
{
    let mut reader = BatchReader::new(files);
    let mut slots: Vec<EncodedImage> = (0..config.batch_size)
        .map(|_| EncodedImage::default())
        .collect();
    let mut manager =
        OutputBufferManager::new(allocator, config.format, config.roi, config.batch_size);
    let mut context = DecoderContext::new(session)?;

    for _ in 0..config.warmup_batches {
        decode_one_batch(&mut reader, &mut slots, probe, &mut manager, &mut context, config, None)?;
    }
    // Warm-up work must finish before the clock starts.
    context.synchronize()?;

    let start = Instant::now();
    let mut decoded = 0;
    for _ in 0..batches {
        decoded += decode_one_batch(
            &mut reader,
            &mut slots,
            probe,
            &mut manager,
            &mut context,
            config,
            config.output_dir.as_deref(),
        )?;
    }
    // All submitted work must complete inside the measurement window.
    context.synchronize()?;
    let elapsed = start.elapsed();

    tracing::debug!(
        thread = thread_index,
        decoded,
        elapsed_ms = elapsed.as_millis() as u64,
        "worker finished"
    );
    Ok((decoded, elapsed))
}

fn decode_one_batch<S, A, P>(
    reader: &mut BatchReader,
    slots: &mut [EncodedImage],
    probe: &P,
    manager: &mut OutputBufferManager<A>,
    context: &mut DecoderContext<S>,
    config: &RunConfig,
    dump_dir: Option<&Path>,
) -> Result<usize>
where
    S: DecodeSession,
    A: PlaneAllocator + HostTransfer,
    P: ImageProbe,
{
    reader.read_next_batch(slots)?;

    // Probe and size first so decode submission runs back to back.
    let mut prepared: Vec<Option<PreparedImage>> = Vec::with_capacity(slots.len());
    for (index, slot) in slots.iter().enumerate() {
        match probe.image_info(slot.bytes()) {
            Ok(info) => {
                tracing::debug!(
                    path = %slot.path().display(),
                    width = info.width(),
                    height = info.height(),
                    channels = info.channels,
                    subsampling = %info.subsampling,
                    "probed image"
                );
                prepared.push(Some(manager.prepare(index, &info)?));
            }
            Err(err) if err.is_recoverable() => {
                tracing::warn!(
                    path = %slot.path().display(),
                    error = %err,
                    "skipping image"
                );
                prepared.push(None);
            }
            Err(err) => return Err(err),
        }
    }

    let mut decoded = 0;
    for (index, prep) in prepared.iter().enumerate() {
        if let Some(prep) = prep {
            let image = manager.device_image(index);
            context.decode_image(slots[index].bytes(), &image, prep.roi)?;
            decoded += 1;
        }
    }

    if let Some(dir) = dump_dir {
        // Host reads require the stream to be drained first.
        context.synchronize()?;
        for (index, prep) in prepared.iter().enumerate() {
            if let Some(prep) = prep {
                let stem = slots[index]
                    .path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("image");
                let path = dir.join(format!("{stem}.bmp"));
                bmp::dump_bmp(
                    manager.allocator(),
                    &manager.device_image(index),
                    config.format,
                    prep.width,
                    prep.height,
                    &path,
                )?;
            }
        }
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvjet_core::types::{ChromaSubsampling, DeviceImage, ImageInfo, MAX_COMPONENTS, PIPELINE_STAGES};
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct MockProbe {
        width: u32,
        height: u32,
    }

    impl ImageProbe for MockProbe {
        fn image_info(&self, _data: &[u8]) -> Result<ImageInfo> {
            let mut info = ImageInfo {
                channels: 3,
                widths: [0; MAX_COMPONENTS],
                heights: [0; MAX_COMPONENTS],
                subsampling: ChromaSubsampling::Css444,
            };
            for c in 0..3 {
                info.widths[c] = self.width;
                info.heights[c] = self.height;
            }
            Ok(info)
        }
    }

    struct MockSession;

    impl DecodeSession for MockSession {
        fn stages(&self) -> usize {
            PIPELINE_STAGES
        }
        fn parse_header(&mut self, _stage: usize, _data: &[u8]) -> Result<()> {
            Ok(())
        }
        fn submit_decode(
            &mut self,
            _stage: usize,
            _output: &DeviceImage,
            _roi: Option<Roi>,
        ) -> Result<()> {
            Ok(())
        }
        fn synchronize(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct MockPlane(usize);

    impl nvjet_core::codec_traits::DevicePlane for MockPlane {
        fn device_ptr(&self) -> u64 {
            0x2000
        }
        fn len(&self) -> usize {
            self.0
        }
    }

    struct MockBackend;

    impl PlaneAllocator for MockBackend {
        type Plane = MockPlane;
        fn alloc_plane(&self, bytes: usize) -> Result<MockPlane> {
            Ok(MockPlane(bytes))
        }
    }

    impl HostTransfer for MockBackend {
        fn read_plane(
            &self,
            _image: &DeviceImage,
            _component: usize,
            row_bytes: usize,
            rows: usize,
        ) -> Result<Vec<u8>> {
            Ok(vec![0; row_bytes * rows])
        }
    }

    fn unique_temp_dir(tag: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let dir = std::env::temp_dir().join(format!(
            "nvjet-orch-{tag}-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn fake_inputs(dir: &Path, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.join(format!("frame{i}.jpg"));
                fs::write(&path, b"not-a-real-jpeg").unwrap();
                path
            })
            .collect()
    }

    fn bmp_dims(path: &Path) -> (u32, u32) {
        let bytes = fs::read(path).unwrap();
        let w = u32::from_le_bytes(bytes[18..22].try_into().unwrap());
        let h = u32::from_le_bytes(bytes[22..26].try_into().unwrap());
        (w, h)
    }

    fn roi_config(roi: Roi, output_dir: PathBuf) -> RunConfig {
        RunConfig {
            batch_size: 2,
            total_images: 4,
            warmup_batches: 1,
            threads: 1,
            format: OutputFormat::Rgbi,
            roi: Some(roi),
            output_dir: Some(output_dir),
        }
    }

    #[test]
    fn end_to_end_roi_in_bounds_dumps_roi_sized_bmp() {
        let in_dir = unique_temp_dir("roi-in");
        let out_dir = unique_temp_dir("roi-in-out");
        let files = fake_inputs(&in_dir, 3);
        let config = roi_config(
            Roi {
                x: 100,
                y: 100,
                width: 200,
                height: 200,
            },
            out_dir.clone(),
        );

        let probe = MockProbe {
            width: 640,
            height: 480,
        };
        let summary = run(&config, files, &probe, |_| Ok(MockSession), |_| Ok(MockBackend))
            .unwrap();

        assert_eq!(summary.images_decoded, 4);
        assert_eq!(bmp_dims(&out_dir.join("frame0.bmp")), (200, 200));

        fs::remove_dir_all(&in_dir).unwrap();
        fs::remove_dir_all(&out_dir).unwrap();
    }

    #[test]
    fn end_to_end_roi_out_of_bounds_dumps_native_size() {
        let in_dir = unique_temp_dir("roi-out");
        let out_dir = unique_temp_dir("roi-out-out");
        let files = fake_inputs(&in_dir, 3);
        let config = roi_config(
            Roi {
                x: 100,
                y: 100,
                width: 700,
                height: 700,
            },
            out_dir.clone(),
        );

        let probe = MockProbe {
            width: 640,
            height: 480,
        };
        let summary = run(&config, files, &probe, |_| Ok(MockSession), |_| Ok(MockBackend))
            .unwrap();

        assert_eq!(summary.images_decoded, 4);
        assert_eq!(bmp_dims(&out_dir.join("frame0.bmp")), (640, 480));

        fs::remove_dir_all(&in_dir).unwrap();
        fs::remove_dir_all(&out_dir).unwrap();
    }

    #[test]
    fn rejects_degenerate_configs() {
        let config = RunConfig {
            batch_size: 0,
            total_images: 1,
            warmup_batches: 0,
            threads: 1,
            format: OutputFormat::Rgb,
            roi: None,
            output_dir: None,
        };
        let probe = MockProbe {
            width: 8,
            height: 8,
        };
        let err = run(
            &config,
            vec![PathBuf::from("a.jpg")],
            &probe,
            |_| Ok(MockSession),
            |_| Ok(MockBackend),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn total_images_rounds_up_to_whole_batches() {
        let in_dir = unique_temp_dir("round");
        let files = fake_inputs(&in_dir, 4);
        let config = RunConfig {
            batch_size: 4,
            total_images: 6,
            warmup_batches: 0,
            threads: 1,
            format: OutputFormat::Rgb,
            roi: None,
            output_dir: None,
        };
        let probe = MockProbe {
            width: 16,
            height: 16,
        };
        let summary = run(&config, files, &probe, |_| Ok(MockSession), |_| Ok(MockBackend))
            .unwrap();
        // 6 images at batch size 4 → 2 full batches.
        assert_eq!(summary.images_decoded, 8);

        fs::remove_dir_all(&in_dir).unwrap();
    }

    #[test]
    fn split_yields_one_nonempty_range_per_thread() {
        let files: Vec<PathBuf> = (0..4).map(|i| PathBuf::from(format!("{i}.jpg"))).collect();
        let chunks = split_files(files, 3);
        assert_eq!(chunks.len(), 3);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 1, 1]);
    }

    #[test]
    fn delivers_full_total_when_files_barely_exceed_threads() {
        // 4 files over 3 threads: every thread must still get a range,
        // or the per-thread quota would leave images undecoded.
        let in_dir = unique_temp_dir("narrow");
        let files = fake_inputs(&in_dir, 4);
        let config = RunConfig {
            batch_size: 2,
            total_images: 6,
            warmup_batches: 0,
            threads: 3,
            format: OutputFormat::Rgb,
            roi: None,
            output_dir: None,
        };
        let probe = MockProbe {
            width: 16,
            height: 16,
        };
        let summary = run(&config, files, &probe, |_| Ok(MockSession), |_| Ok(MockBackend))
            .unwrap();
        assert!(
            summary.images_decoded >= config.total_images,
            "requested {} images but only {} were decoded",
            config.total_images,
            summary.images_decoded
        );

        fs::remove_dir_all(&in_dir).unwrap();
    }

    #[test]
    fn splits_work_across_threads() {
        let in_dir = unique_temp_dir("threads");
        let files = fake_inputs(&in_dir, 8);
        let config = RunConfig {
            batch_size: 2,
            total_images: 8,
            warmup_batches: 0,
            threads: 2,
            format: OutputFormat::Rgb,
            roi: None,
            output_dir: None,
        };
        let probe = MockProbe {
            width: 16,
            height: 16,
        };
        let summary = run(&config, files, &probe, |_| Ok(MockSession), |_| Ok(MockBackend))
            .unwrap();
        assert_eq!(summary.images_decoded, 8);

        fs::remove_dir_all(&in_dir).unwrap();
    }
}
