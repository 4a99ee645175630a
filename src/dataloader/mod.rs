use anyhow::Result;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod indexed_dataset;
pub mod transforms;

pub use indexed_dataset::IndexedDataset;
pub use transforms::{CenterCrop, Grayscale, Resize, TransformConfig};

/// A single dataset item: the decoded image and its class label.
#[derive(Debug, Clone)]
pub struct Sample {
    pub image: DynamicImage,
    pub label: String,
}

/// An image-to-image operation applied after decoding.
///
/// Failures propagate to the `get_item` caller unchanged.
pub trait Transform: Send + Sync {
    fn apply(&self, image: DynamicImage) -> Result<DynamicImage>;
}

/// Ordered chain of transforms, applied left to right.
pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }

    pub fn apply(&self, image: DynamicImage) -> Result<DynamicImage> {
        let mut image = image;
        for transform in &self.transforms {
            image = transform.apply(image)?;
        }
        Ok(image)
    }
}

/// What registering an already-registered class label does to the
/// flattened (file index, label) pair list.
///
/// The registry entry itself is always replaced; only the pair list
/// behavior differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the label's previously added pairs and append the new ones on
    /// top. The dataset grows on every re-registration. This matches the
    /// historical behavior and is the default.
    #[default]
    Accumulate,
    /// Drop the label's previous pairs before appending the new ones.
    Replace,
}

/// Sort paths lexicographically by their full path string. This ordering
/// defines the file-index space and must stay stable across calls.
pub fn sort_paths(paths: &mut Vec<PathBuf>) {
    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
}
