use tracing::debug;

use super::types::QuoteRecord;
use crate::images::ExtractedImage;

/// Attach extracted images to items by running position.
///
/// Items are walked across all quotes in order; the item at position `p`
/// gets `image_index = Some(p)` when an image with `source_index == p`
/// exists. Images beyond the last item are dropped. Positions do not restart
/// per quote, so they only equal `ordinal` inside the first quote.
pub fn attach_images(quotes: &mut [QuoteRecord], images: &[ExtractedImage]) {
    let mut attached = 0usize;
    let items = quotes.iter_mut().flat_map(|quote| quote.items.iter_mut());
    for (position, item) in items.enumerate() {
        if images.iter().any(|image| image.source_index == position) {
            item.image_index = Some(position);
            attached += 1;
        } else {
            item.image_index = None;
        }
    }
    debug!(attached, images = images.len(), "attached images to items");
}

/// Keep only image indices that name an extracted image.
pub fn retain_known_images(quotes: &mut [QuoteRecord], images: &[ExtractedImage]) {
    for item in quotes.iter_mut().flat_map(|quote| quote.items.iter_mut()) {
        if let Some(index) = item.image_index
            && !images.iter().any(|image| image.source_index == index)
        {
            item.image_index = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::QuoteItemRecord;
    use bytes::Bytes;
    use chrono::NaiveDate;

    fn quote(number: &str, names: &[&str]) -> QuoteRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        QuoteRecord::new(number, date).with_items(
            names
                .iter()
                .map(|name| QuoteItemRecord::new(*name, "", 1.0, Some(1.0), 0.0))
                .collect(),
        )
    }

    fn images(count: usize) -> Vec<ExtractedImage> {
        (0..count)
            .map(|source_index| ExtractedImage {
                bytes: Bytes::from_static(b"\xFF\xD8\xFF\xFF\xD9"),
                source_index,
            })
            .collect()
    }

    #[test]
    fn test_positions_run_across_quotes() {
        let mut quotes = vec![quote("Q1", &["a", "b"]), quote("Q2", &["c", "d"])];
        attach_images(&mut quotes, &images(3));
        assert_eq!(quotes[0].items[0].image_index, Some(0));
        assert_eq!(quotes[0].items[1].image_index, Some(1));
        assert_eq!(quotes[1].items[0].image_index, Some(2));
        assert_eq!(quotes[1].items[0].ordinal, 0);
        assert_eq!(quotes[1].items[1].image_index, None);
    }

    #[test]
    fn test_surplus_images_are_dropped() {
        let mut quotes = vec![quote("Q1", &["a"])];
        attach_images(&mut quotes, &images(4));
        assert_eq!(quotes[0].items[0].image_index, Some(0));
    }

    #[test]
    fn test_retain_known_images() {
        let mut quotes = vec![quote("Q1", &["a", "b"])];
        quotes[0].items[0].image_index = Some(1);
        quotes[0].items[1].image_index = Some(7);
        retain_known_images(&mut quotes, &images(2));
        assert_eq!(quotes[0].items[0].image_index, Some(1));
        assert_eq!(quotes[0].items[1].image_index, None);
    }
}
