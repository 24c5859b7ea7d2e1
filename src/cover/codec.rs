use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;
use tracing::debug;

use crate::track::CoverArt;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("{}: unrecognized image format", .0.display())]
    UnknownFormat(PathBuf),
}

/// Turns an image file into front-cover bytes.
pub trait ImageCodec {
    /// Decode `path`, shrink it to fit `max_width`×`max_height` if larger,
    /// and re-encode it in its own format.
    fn prepare_cover(
        &self,
        path: &Path,
        max_width: u32,
        max_height: u32,
    ) -> Result<CoverArt, CodecError>;
}

/// [`ImageCodec`] backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterCodec;

impl RasterCodec {
    pub fn decode(&self, path: &Path) -> Result<DynamicImage, CodecError> {
        Ok(image::open(path)?)
    }

    /// Keeps aspect ratio. Never upscales.
    pub fn resize_to_fit(&self, img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
        if img.width() <= max_width && img.height() <= max_height {
            return img;
        }
        img.resize(max_width, max_height, FilterType::Lanczos3)
    }

    pub fn encode_bytes(&self, img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
        let mut buf = Cursor::new(Vec::new());
        match format {
            // JPEG has no alpha channel.
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut buf, format)?,
            _ => img.write_to(&mut buf, format)?,
        }
        Ok(buf.into_inner())
    }

    pub fn guess_mime_type(&self, path: &Path) -> String {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

impl ImageCodec for RasterCodec {
    fn prepare_cover(
        &self,
        path: &Path,
        max_width: u32,
        max_height: u32,
    ) -> Result<CoverArt, CodecError> {
        let format =
            ImageFormat::from_path(path).map_err(|_| CodecError::UnknownFormat(path.to_path_buf()))?;
        let img = self.decode(path)?;
        let (width, height) = (img.width(), img.height());
        let img = self.resize_to_fit(img, max_width, max_height);
        debug!(
            image = %path.display(),
            from = %format!("{width}x{height}"),
            to = %format!("{}x{}", img.width(), img.height()),
            "prepared cover"
        );
        Ok(CoverArt {
            data: self.encode_bytes(&img, format)?,
            mime_type: self.guess_mime_type(path),
        })
    }
}
