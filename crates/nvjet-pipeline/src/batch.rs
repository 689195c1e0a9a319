//! Batch reading with a wrapping cursor over the input file list.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use nvjet_core::error::{EngineError, Result};

/// One batch slot holding an encoded JPEG bitstream.
///
/// The backing `Vec` only ever grows: refilling a slot with a smaller
/// file reuses the existing allocation and shortens the valid prefix.
#[derive(Default)]
pub struct EncodedImage {
    data: Vec<u8>,
    len: usize,
    path: PathBuf,
}

impl EncodedImage {
    /// Valid bitstream bytes of the most recent fill.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Path of the file currently occupying this slot.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fill(&mut self, path: &Path) -> Result<()> {
        let mut read = |path: &Path| -> std::io::Result<usize> {
            let mut file = File::open(path)?;
            let size = file.metadata()?.len() as usize;
            if self.data.len() < size {
                self.data.resize(size, 0);
            }
            file.read_exact(&mut self.data[..size])?;
            Ok(size)
        };
        self.len = read(path).map_err(|source| EngineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.path = path.to_path_buf();
        Ok(())
    }
}

/// Wrapping cursor over an owned list of candidate files.
///
/// Each worker thread owns one reader over a disjoint sub-range of the
/// global input list, so removal needs no locking.
pub struct BatchReader {
    files: Vec<PathBuf>,
    pos: usize,
}

impl BatchReader {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files, pos: 0 }
    }

    /// Candidate files still in rotation.
    pub fn remaining(&self) -> usize {
        self.files.len()
    }

    /// Fill every slot with the next readable files, wrapping to the
    /// start of the list when the end is reached.
    ///
    /// An unreadable file is removed from the list and the slot retried
    /// with the file now occupying its position.  Fails with
    /// [`EngineError::FileListExhausted`] once no candidates remain.
    pub fn read_next_batch(&mut self, slots: &mut [EncodedImage]) -> Result<()> {
        for slot in slots.iter_mut() {
            loop {
                if self.files.is_empty() {
                    return Err(EngineError::FileListExhausted);
                }
                if self.pos >= self.files.len() {
                    tracing::warn!("input list exhausted, wrapping to the first file");
                    self.pos = 0;
                }
                let path = self.files[self.pos].clone();
                match slot.fill(&path) {
                    Ok(()) => {
                        self.pos += 1;
                        break;
                    }
                    Err(err) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %err,
                            "removing unreadable file from the input list"
                        );
                        self.files.remove(self.pos);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn unique_temp_dir(tag: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let dir = std::env::temp_dir().join(format!(
            "nvjet-batch-{tag}-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_files(dir: &Path, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.join(format!("img{i:02}.jpg"));
                fs::write(&path, format!("payload-{i}")).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn fills_exactly_batch_size_slots() {
        let dir = unique_temp_dir("fill");
        let files = write_files(&dir, 4);
        let mut reader = BatchReader::new(files);
        let mut slots: Vec<EncodedImage> = (0..3).map(|_| EncodedImage::default()).collect();

        reader.read_next_batch(&mut slots).unwrap();
        assert_eq!(slots[0].bytes(), b"payload-0");
        assert_eq!(slots[2].bytes(), b"payload-2");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn wraps_deterministically_past_the_end() {
        let dir = unique_temp_dir("wrap");
        let files = write_files(&dir, 5);
        let mut reader = BatchReader::new(files);
        let mut slots: Vec<EncodedImage> = (0..8).map(|_| EncodedImage::default()).collect();

        reader.read_next_batch(&mut slots).unwrap();
        // Slots 5..8 repeat files 0..3.
        assert_eq!(slots[5].bytes(), b"payload-0");
        assert_eq!(slots[6].bytes(), b"payload-1");
        assert_eq!(slots[7].bytes(), b"payload-2");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn removes_unreadable_files_and_retries() {
        let dir = unique_temp_dir("remove");
        let mut files = write_files(&dir, 3);
        files.insert(1, dir.join("missing.jpg"));
        let mut reader = BatchReader::new(files);
        let mut slots: Vec<EncodedImage> = (0..3).map(|_| EncodedImage::default()).collect();

        reader.read_next_batch(&mut slots).unwrap();
        assert_eq!(slots[0].bytes(), b"payload-0");
        // The missing entry was dropped; its slot got the next real file.
        assert_eq!(slots[1].bytes(), b"payload-1");
        assert_eq!(reader.remaining(), 3);

        // Removal persists across calls.
        reader.read_next_batch(&mut slots).unwrap();
        assert_eq!(reader.remaining(), 3);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_list_is_exhaustion() {
        let mut reader = BatchReader::new(Vec::new());
        let mut slots = vec![EncodedImage::default()];
        assert!(matches!(
            reader.read_next_batch(&mut slots),
            Err(EngineError::FileListExhausted)
        ));
    }

    #[test]
    fn all_files_unreadable_is_exhaustion() {
        let dir = unique_temp_dir("exhaust");
        let files = vec![dir.join("a.jpg"), dir.join("b.jpg")];
        let mut reader = BatchReader::new(files);
        let mut slots = vec![EncodedImage::default()];
        assert!(matches!(
            reader.read_next_batch(&mut slots),
            Err(EngineError::FileListExhausted)
        ));
        assert_eq!(reader.remaining(), 0);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn slot_buffer_grows_only() {
        let dir = unique_temp_dir("grow");
        let big = dir.join("big.jpg");
        let small = dir.join("small.jpg");
        fs::write(&big, vec![0xAA; 4096]).unwrap();
        fs::write(&small, vec![0xBB; 16]).unwrap();

        let mut slot = EncodedImage::default();
        slot.fill(&big).unwrap();
        let cap_after_big = slot.data.capacity();
        slot.fill(&small).unwrap();
        assert_eq!(slot.bytes().len(), 16);
        assert!(slot.data.capacity() >= cap_after_big);

        fs::remove_dir_all(&dir).unwrap();
    }
}
