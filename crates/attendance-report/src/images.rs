//! Raster images embedded as PDF image XObjects.

use std::path::Path;

use image::RgbaImage;
use lopdf::{Document, ObjectId, Stream, dictionary};

use crate::error::{ReportError, Result};

/// Decoded image, split into colour samples and an optional alpha mask.
#[derive(Debug, Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl RasterImage {
    pub fn load(path: &Path) -> Result<Self> {
        let decoded = image::open(path).map_err(|source| ReportError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_rgba(&decoded.to_rgba8()))
    }

    /// Loads an optional asset, logging and skipping anything unusable.
    pub fn load_optional(path: Option<&Path>, role: &str) -> Option<Self> {
        let path = path?;
        match Self::load(path) {
            Ok(image) => Some(image),
            Err(error) => {
                tracing::warn!(role, path = %path.display(), %error, "image unavailable, skipping");
                None
            }
        }
    }

    pub fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = width as usize * height as usize;
        let mut rgb = Vec::with_capacity(pixels * 3);
        let mut alpha = Vec::with_capacity(pixels);
        for pixel in image.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
        }
        let opaque = alpha.iter().all(|&a| a == u8::MAX);
        Self {
            width,
            height,
            rgb,
            alpha: (!opaque).then_some(alpha),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Adds the image (and its soft mask) to `doc`.
    pub fn write(&self, doc: &mut Document) -> ObjectId {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(self.width),
            "Height" => i64::from(self.height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        if let Some(alpha) = &self.alpha {
            let mask_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(self.width),
                    "Height" => i64::from(self.height),
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha.clone(),
            ));
            dict.set("SMask", mask_id);
        }
        doc.add_object(Stream::new(dict, self.rgb.clone()))
    }
}
