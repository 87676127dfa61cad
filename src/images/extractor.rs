// JPEG extraction by signature scanning
//
// The scan works on the raw upload, independent of the workbook decoder, so it
// also finds images the sheet reader never surfaces.

use bytes::Bytes;
use memchr::memmem;
use tracing::debug;

/// JPEG start-of-image marker followed by the first marker prefix
pub const JPEG_START: &[u8] = &[0xFF, 0xD8, 0xFF];
/// JPEG end-of-image marker
pub const JPEG_END: &[u8] = &[0xFF, 0xD9];

/// An image found in the raw buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// Image bytes from the start signature through the end signature
    pub bytes: Bytes,
    /// 0-based discovery order
    pub source_index: usize,
}

impl ExtractedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Scan `data` for JPEG start/end signature pairs, in byte order.
///
/// Each image runs from a start signature to the first end signature at or
/// after it; scanning resumes past that end. Stops at the first missing signature.
/// Slices share the input allocation.
pub fn extract_images(data: &Bytes) -> Vec<ExtractedImage> {
    let start_finder = memmem::Finder::new(JPEG_START);
    let end_finder = memmem::Finder::new(JPEG_END);

    let mut images = Vec::new();
    let mut pos = 0usize;

    while let Some(rel_start) = start_finder.find(&data[pos..]) {
        let start = pos + rel_start;
        let Some(rel_end) = end_finder.find(&data[start..]) else {
            break;
        };
        let end = start + rel_end + JPEG_END.len();

        images.push(ExtractedImage {
            bytes: data.slice(start..end),
            source_index: images.len(),
        });
        pos = end;
    }

    debug!(count = images.len(), "extracted embedded images");
    images
}
