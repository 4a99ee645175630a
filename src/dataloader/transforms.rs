use anyhow::{anyhow, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::dataloader::{Compose, Transform};

/// Resize to exactly (width, height) using Lanczos3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
}

impl Transform for Resize {
    fn apply(&self, image: DynamicImage) -> Result<DynamicImage> {
        Ok(image.resize_exact(self.width, self.height, FilterType::Lanczos3))
    }
}

/// Convert to single-channel 8-bit luma.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grayscale;

impl Transform for Grayscale {
    fn apply(&self, image: DynamicImage) -> Result<DynamicImage> {
        Ok(DynamicImage::ImageLuma8(image.to_luma8()))
    }
}

/// Crop a (width, height) window around the image center.
///
/// Fails if the image is smaller than the requested window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterCrop {
    pub width: u32,
    pub height: u32,
}

impl Transform for CenterCrop {
    fn apply(&self, image: DynamicImage) -> Result<DynamicImage> {
        let (w, h) = (image.width(), image.height());
        if w < self.width || h < self.height {
            return Err(anyhow!(
                "Cannot crop {}x{} from a {}x{} image",
                self.width,
                self.height,
                w,
                h
            ));
        }
        let x = (w - self.width) / 2;
        let y = (h - self.height) / 2;
        Ok(image.crop_imm(x, y, self.width, self.height))
    }
}

/// One step of a serializable transform pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformSpec {
    Resize { width: u32, height: u32 },
    Grayscale,
    CenterCrop { width: u32, height: u32 },
}

/// Serializable description of a transform pipeline, applied in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    pub transforms: Vec<TransformSpec>,
}

impl TransformConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_compose(self) -> Compose {
        let transforms = self
            .transforms
            .into_iter()
            .map(|spec| -> Box<dyn Transform> {
                match spec {
                    TransformSpec::Resize { width, height } => Box::new(Resize { width, height }),
                    TransformSpec::Grayscale => Box::new(Grayscale),
                    TransformSpec::CenterCrop { width, height } => {
                        Box::new(CenterCrop { width, height })
                    }
                }
            })
            .collect();
        Compose::new(transforms)
    }
}
