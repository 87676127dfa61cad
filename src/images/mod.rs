// Embedded raster image extraction
//
// Uploaded quote workbooks carry product photos as JPEG streams. They are
// located by signature in the raw bytes and matched to line items by position
// afterwards (see `quote::attach_images`).
//
// ```no_run
// use bytes::Bytes;
// use quotesheet::images::extract_images;
//
// let data = Bytes::from(std::fs::read("quotes.xlsx")?);
// for image in extract_images(&data) {
//     println!("image {} is {} bytes", image.source_index, image.len());
// }
// # Ok::<(), std::io::Error>(())
// ```

pub mod extractor;

pub use extractor::{ExtractedImage, JPEG_END, JPEG_START, extract_images};
