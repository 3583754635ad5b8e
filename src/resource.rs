//! Named resource extraction from manifest containers.
//!
//! A manifest container is a ZIP archive; resources are its file entries.
//! Extraction never writes to disk: the resource is read straight into
//! memory from the already-verified stream.

use crate::error::{ChannelInfoError, Result};
use crate::stream::ReadSeek;
use log::trace;
use std::io::Read;

/// Upper bound on the size of a single extracted resource.
pub const MAX_RESOURCE_BYTES: u64 = 1024 * 1024;

/// Trait for locating a named resource inside a container stream.
///
/// # Examples
///
/// ```
/// use release_channel::resource::{ResourceExtractor, ZipResourceExtractor};
///
/// let extractor = ZipResourceExtractor;
/// // extractor.extract(&mut stream, "release-channel/ReleaseInfo.json")
/// ```
pub trait ResourceExtractor {
    /// Return the raw bytes of the resource called `name`.
    ///
    /// The stream must already be positioned at its start.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelInfoError::ResourceNotFound`] when the container
    /// cannot be read or holds no such resource, and
    /// [`ChannelInfoError::InvalidPayload`] when the resource exceeds
    /// [`MAX_RESOURCE_BYTES`].
    fn extract(&self, stream: &mut dyn ReadSeek, name: &str) -> Result<Vec<u8>>;
}

/// Default extractor reading resources from ZIP archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipResourceExtractor;

impl ResourceExtractor for ZipResourceExtractor {
    fn extract(&self, stream: &mut dyn ReadSeek, name: &str) -> Result<Vec<u8>> {
        let not_found = || ChannelInfoError::ResourceNotFound {
            name: name.to_owned(),
        };

        let mut archive = zip::ZipArchive::new(stream).map_err(|e| {
            trace!(target: "release_channel::resource", "container unreadable: {e}");
            not_found()
        })?;
        let entry = archive.by_name(name).map_err(|_| not_found())?;
        if entry.is_dir() {
            return Err(not_found());
        }
        if entry.size() > MAX_RESOURCE_BYTES {
            return Err(ChannelInfoError::InvalidPayload {
                reason: format!(
                    "resource \"{name}\" is {} bytes; limit is {MAX_RESOURCE_BYTES}",
                    entry.size()
                ),
            });
        }

        let mut bytes = Vec::new();
        entry.take(MAX_RESOURCE_BYTES).read_to_end(&mut bytes)?;
        trace!(
            target: "release_channel::resource",
            "extracted {} bytes from \"{name}\"",
            bytes.len()
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn archive_with(entries: &[(&str, &[u8])]) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start entry");
            writer.write_all(bytes).expect("write entry");
        }
        let mut cursor = writer.finish().expect("finish archive");
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn extracts_named_resource() {
        let mut stream = archive_with(&[("a.txt", &b"alpha"[..]), ("dir/b.json", &b"{}"[..])]);
        let bytes = ZipResourceExtractor
            .extract(&mut stream, "dir/b.json")
            .expect("resource present");
        assert_eq!(bytes, b"{}");
    }

    #[test]
    fn missing_resource_is_not_found() {
        let mut stream = archive_with(&[("a.txt", &b"alpha"[..])]);
        let result = ZipResourceExtractor.extract(&mut stream, "missing.json");
        assert!(matches!(
            result,
            Err(ChannelInfoError::ResourceNotFound { ref name }) if name == "missing.json"
        ));
    }

    #[test]
    fn non_archive_stream_is_not_found() {
        let mut stream = Cursor::new(b"definitely not a zip archive".to_vec());
        let result = ZipResourceExtractor.extract(&mut stream, "a.txt");
        assert!(matches!(result, Err(ChannelInfoError::ResourceNotFound { .. })));
    }

    #[test]
    fn oversized_resource_is_invalid_payload() {
        let len = usize::try_from(MAX_RESOURCE_BYTES + 1).expect("length fits in memory");
        let big = vec![b'a'; len];
        let mut stream = archive_with(&[("big.json", big.as_slice())]);

        let result = ZipResourceExtractor.extract(&mut stream, "big.json");
        assert!(matches!(
            result,
            Err(ChannelInfoError::InvalidPayload { ref reason }) if reason.contains("big.json")
        ));
    }

    #[test]
    fn resource_at_limit_is_extracted() {
        let len = usize::try_from(MAX_RESOURCE_BYTES).expect("length fits in memory");
        let mut stream = archive_with(&[("edge.json", vec![b'a'; len].as_slice())]);

        let bytes = ZipResourceExtractor
            .extract(&mut stream, "edge.json")
            .expect("resource present");
        assert_eq!(bytes.len(), len);
    }

    #[test]
    fn empty_resource_is_returned_empty() {
        let mut stream = archive_with(&[("empty.json", &b""[..])]);
        let bytes = ZipResourceExtractor
            .extract(&mut stream, "empty.json")
            .expect("resource present");
        assert!(bytes.is_empty());
    }
}
