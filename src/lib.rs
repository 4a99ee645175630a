pub mod dataloader;

pub use dataloader::indexed_dataset::IndexedDataset;
pub use dataloader::transforms::{CenterCrop, Grayscale, Resize, TransformConfig, TransformSpec};
pub use dataloader::{Compose, DuplicatePolicy, Sample, Transform};
