//! Artwork thumbnails shown next to each row

use bytes::Bytes;

use super::error::FetchError;

/// Decoded artwork, reduced to what a terminal cell can show
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// Average color of the artwork
    pub rgb: [u8; 3],
}

impl Thumbnail {
    /// Decode image bytes on the blocking pool.
    pub async fn decode(bytes: Bytes) -> Result<Self, FetchError> {
        tokio::task::spawn_blocking(move || Self::decode_blocking(&bytes))
            .await
            .map_err(|e| FetchError::Decode(format!("decode task failed: {e}")))?
    }

    fn decode_blocking(bytes: &[u8]) -> Result<Self, FetchError> {
        let image = image::load_from_memory(bytes)?;
        let (width, height) = (image.width(), image.height());

        // Averaging a tiny resample is enough for a single swatch
        let small = image.thumbnail(8, 8).to_rgb8();
        let pixels = small.pixels().len().max(1) as u64;
        let mut sum = [0u64; 3];
        for pixel in small.pixels() {
            for (acc, channel) in sum.iter_mut().zip(pixel.0) {
                *acc += channel as u64;
            }
        }

        Ok(Self {
            width,
            height,
            rgb: sum.map(|c| (c / pixels) as u8),
        })
    }
}

/// Image displayed in a row's thumbnail cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RowImage {
    #[default]
    Placeholder,
    Loaded(Thumbnail),
}

impl RowImage {
    pub fn is_loaded(&self) -> bool {
        matches!(self, RowImage::Loaded(_))
    }
}

#[cfg(test)]
pub(crate) fn encode_png(width: u32, height: u32, rgb: [u8; 3]) -> Bytes {
    use std::io::Cursor;

    let image = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    Bytes::from(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn decodes_average_color_and_size() {
        let thumbnail = Thumbnail::decode(encode_png(100, 60, [200, 40, 10])).await.unwrap();
        assert_eq!(thumbnail.width, 100);
        assert_eq!(thumbnail.height, 60);
        assert_eq!(thumbnail.rgb, [200, 40, 10]);
    }

    #[tokio::test]
    async fn garbage_bytes_are_a_decode_error() {
        let err = Thumbnail::decode(Bytes::from_static(b"not an image")).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
