//! Ordered concatenation of chunk files and the atomic finish.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::chunk::ChunkFile;
use crate::error::DownloadError;

/// Copies every chunk into `out` in strict ascending index order.
///
/// Requires a chunk for every index `0..chunk_count`; a gap or an
/// out-of-order entry is `MissingChunk`. Each chunk file is rewound to
/// offset 0 first (fetchers leave the cursor at end-of-write). Ascending
/// order is the correctness-critical invariant: bytes appended out of order
/// are a corrupt output. Returns the total byte count written, after
/// syncing `out`.
pub fn combine_chunks(
    chunks: &[ChunkFile],
    chunk_count: usize,
    out: &mut File,
) -> Result<u64, DownloadError> {
    let mut written = 0u64;
    for position in 0..chunk_count {
        let chunk = chunks
            .get(position)
            .ok_or(DownloadError::MissingChunk { index: position })?;
        if chunk.index() != position {
            return Err(DownloadError::MissingChunk { index: position });
        }
        chunk.rewind()?;
        written += io::copy(&mut chunk.reader(), out)?;
    }
    out.sync_all()?;
    Ok(written)
}

/// Atomically renames the combined temp file into place.
///
/// Last step of a successful job; failure leaves the temp file and the part
/// files on disk for manual recovery.
pub fn finalize(temp_path: &Path, final_path: &Path) -> Result<(), DownloadError> {
    std::fs::rename(temp_path, final_path).map_err(|source| DownloadError::Rename {
        temp: temp_path.to_path_buf(),
        final_path: final_path.to_path_buf(),
        source,
    })
}

/// Best-effort removal of the part files after a successful combine.
pub fn remove_part_files(chunks: Vec<ChunkFile>) {
    for chunk in chunks {
        let path = chunk.path().to_path_buf();
        if let Err(e) = chunk.remove() {
            tracing::warn!(path = %path.display(), error = %e, "could not remove part file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{self, temp_output_path};

    fn chunk_with(dir: &Path, index: usize, data: &[u8]) -> ChunkFile {
        let c = ChunkFile::create(dir, "out.bin", index).unwrap();
        c.write_all(data).unwrap();
        c
    }

    #[test]
    fn combine_preserves_index_order() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = vec![
            chunk_with(dir.path(), 0, b"aaa"),
            chunk_with(dir.path(), 1, b"bb"),
            chunk_with(dir.path(), 2, b"cccc"),
        ];
        let out_path = dir.path().join("combined");
        let mut out = File::create(&out_path).unwrap();

        let written = combine_chunks(&chunks, 3, &mut out).unwrap();
        assert_eq!(written, 9);
        assert_eq!(std::fs::read(&out_path).unwrap(), b"aaabbcccc");
    }

    #[test]
    fn combine_rejects_gap() {
        let dir = tempfile::tempdir().unwrap();
        // Chunk 1 never created: position 1 holds index 2.
        let chunks = vec![
            chunk_with(dir.path(), 0, b"aa"),
            chunk_with(dir.path(), 2, b"cc"),
        ];
        let mut out = File::create(dir.path().join("combined")).unwrap();
        assert!(matches!(
            combine_chunks(&chunks, 3, &mut out),
            Err(DownloadError::MissingChunk { index: 1 })
        ));
    }

    #[test]
    fn combine_rejects_short_set() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = vec![chunk_with(dir.path(), 0, b"aa")];
        let mut out = File::create(dir.path().join("combined")).unwrap();
        assert!(matches!(
            combine_chunks(&chunks, 2, &mut out),
            Err(DownloadError::MissingChunk { index: 1 })
        ));
    }

    #[test]
    fn finalize_renames_temp_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("output.bin");
        let temp = temp_output_path(&final_path);
        std::fs::write(&temp, b"payload").unwrap();

        finalize(&temp, &final_path).unwrap();
        assert!(!temp.exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"payload");
    }

    #[test]
    fn finalize_missing_temp_is_rename_error() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("output.bin");
        let temp = temp_output_path(&final_path);
        assert!(matches!(
            finalize(&temp, &final_path),
            Err(DownloadError::Rename { .. })
        ));
        assert!(!final_path.exists());
    }

    #[test]
    fn combine_then_finalize_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = vec![
            chunk_with(dir.path(), 0, b"hello "),
            chunk_with(dir.path(), 1, b"world"),
        ];
        let final_path = dir.path().join("greeting.txt");
        let temp = temp_output_path(&final_path);
        let mut out = File::create(&temp).unwrap();

        let written = combine_chunks(&chunks, 2, &mut out).unwrap();
        drop(out);
        finalize(&temp, &final_path).unwrap();
        remove_part_files(chunks);

        assert_eq!(written, 11);
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello world");
        assert!(!chunk::part_path(dir.path(), "out.bin", 0).exists());
        assert!(!chunk::part_path(dir.path(), "out.bin", 1).exists());
    }
}
