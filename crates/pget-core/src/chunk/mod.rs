//! Chunk files on disk: naming, lifecycle, and the shared handles.
//!
//! Each chunk streams into its own hidden part file next to the destination
//! (`.<filename>.pget<index>`). Part files double as the resume state: their
//! length is the byte count already written. The combined output goes to
//! `<final>.part` and is renamed into place as the last step.

mod fetch;

pub use fetch::fetch_chunk;

use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Temporary suffix for the combined output before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path of the part file for one chunk: `<dir>/.<filename>.pget<index>`.
pub fn part_path(dir: &Path, filename: &str, index: usize) -> PathBuf {
    dir.join(format!(".{}.pget{}", filename, index))
}

/// Path for the combined temp output: appends `.part` to the final path.
pub fn temp_output_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// An open part file for one chunk. Cloning shares the same OS handle, so a
/// fetcher thread and the combiner see the same cursor; exactly one fetcher
/// ever writes to a given chunk.
#[derive(Clone)]
pub struct ChunkFile {
    index: usize,
    path: PathBuf,
    file: Arc<File>,
}

impl ChunkFile {
    /// Creates (truncating) the part file for a fresh download.
    pub fn create(dir: &Path, filename: &str, index: usize) -> io::Result<Self> {
        let path = part_path(dir, filename, index);
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            index,
            path,
            file: Arc::new(file),
        })
    }

    /// Opens (or creates) the part file without truncating, keeping any
    /// bytes a previous run already wrote.
    pub fn open_resume(dir: &Path, filename: &str, index: usize) -> io::Result<Self> {
        let path = part_path(dir, filename, index);
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        Ok(Self {
            index,
            path,
            file: Arc::new(file),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Moves the write cursor to end-of-file; a resumed fetcher appends
    /// after what is already there.
    pub fn seek_to_end(&self) -> io::Result<u64> {
        (&*self.file).seek(SeekFrom::End(0))
    }

    /// Rewinds the shared cursor to offset 0 (the combiner reads from the
    /// start; fetchers leave the cursor at end-of-write).
    pub fn rewind(&self) -> io::Result<()> {
        (&*self.file).seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Appends `data` at the current cursor.
    pub fn write_all(&self, data: &[u8]) -> io::Result<()> {
        (&*self.file).write_all(data)
    }

    /// Reader view over the same handle, for the combiner.
    pub(crate) fn reader(&self) -> &File {
        &self.file
    }

    /// Closes this handle and deletes the part file.
    pub fn remove(self) -> io::Result<()> {
        let path = self.path.clone();
        drop(self.file);
        fs::remove_file(path)
    }
}
