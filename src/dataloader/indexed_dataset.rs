use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::dataloader::{sort_paths, Compose, DuplicatePolicy, Sample};

/// A flat-directory image dataset with caller-assigned class indexes.
///
/// Unlike `ImageFolder`-style loaders there is no subdirectory convention:
/// the directory is listed once at construction, its files sorted to fix a
/// stable file-index space, and the caller then registers which indexes
/// belong to which class. Positional lookup resolves through the flattened
/// (file index, label) pair list and decodes the file on every call.
pub struct IndexedDataset {
    image_paths: Vec<PathBuf>,
    indexes_to_classes: HashMap<String, Vec<usize>>,
    index_class_pairs: Vec<(usize, String)>,
    transform: Option<Compose>,
    duplicate_policy: DuplicatePolicy,
}

impl IndexedDataset {
    /// List `img_dir`, keeping regular files only, sorted by full path.
    ///
    /// There is no extension filter; any regular file becomes part of the
    /// file-index space, and a non-image file only fails once `get_item`
    /// tries to decode it.
    pub fn new<P: AsRef<Path>>(img_dir: P, transform: Option<Compose>) -> Result<Self> {
        let img_dir = img_dir.as_ref();

        let mut image_paths: Vec<PathBuf> = fs::read_dir(img_dir)
            .with_context(|| format!("Failed to read image directory: {:?}", img_dir))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        sort_paths(&mut image_paths);
        debug!("Found {} files in {:?}", image_paths.len(), img_dir);

        Ok(Self {
            image_paths,
            indexes_to_classes: HashMap::new(),
            index_class_pairs: Vec::new(),
            transform,
            duplicate_policy: DuplicatePolicy::default(),
        })
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Associate a list of file indexes with a class label.
    ///
    /// Indexes are not range-checked here; an index outside the file list
    /// only fails once `get_item` resolves it. Registering a label twice
    /// warns and replaces the registry entry; the effect on the pair list
    /// depends on the configured [`DuplicatePolicy`].
    pub fn add_class_indexes(&mut self, class_name: &str, indexes: Vec<usize>) {
        if self.indexes_to_classes.contains_key(class_name) {
            warn!("Class '{}' already exists. Updating indexes.", class_name);
            if self.duplicate_policy == DuplicatePolicy::Replace {
                self.index_class_pairs
                    .retain(|(_, label)| label != class_name);
            }
        }

        self.index_class_pairs
            .extend(indexes.iter().map(|&idx| (idx, class_name.to_string())));
        self.indexes_to_classes
            .insert(class_name.to_string(), indexes);

        // Always a full re-sort, never a partial patch: position i must be
        // the i-th pair ordered by (file index, label).
        self.index_class_pairs.sort();
    }

    /// Number of positions in the flattened pair list, not the number of
    /// files on disk.
    pub fn len(&self) -> usize {
        self.index_class_pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_class_pairs.is_empty()
    }

    /// Decode and return the sample at `position`.
    ///
    /// Every call re-reads the file from disk; nothing is cached. A stored
    /// file index outside the file list is caught here, not at
    /// registration time.
    pub fn get_item(&self, position: usize) -> Result<Sample> {
        let (index, class_name) = self
            .index_class_pairs
            .get(position)
            .ok_or_else(|| anyhow!("Position {} out of bounds (len {})", position, self.len()))?;

        let img_path = self.image_paths.get(*index).ok_or_else(|| {
            anyhow!(
                "Class '{}' references file index {} but only {} files exist",
                class_name,
                index,
                self.image_paths.len()
            )
        })?;

        let mut image = image::open(img_path)
            .with_context(|| format!("Failed to open image: {:?}", img_path))?;

        if let Some(transform) = &self.transform {
            image = transform.apply(image)?;
        }

        Ok(Sample {
            image,
            label: class_name.clone(),
        })
    }

    /// Indexes currently registered for `class_name`, if any.
    pub fn class_indexes(&self, class_name: &str) -> Option<&[usize]> {
        self.indexes_to_classes.get(class_name).map(Vec::as_slice)
    }

    /// Registered class labels, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .indexes_to_classes
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// The sorted file paths forming the file-index space.
    pub fn image_paths(&self) -> &[PathBuf] {
        &self.image_paths
    }
}
