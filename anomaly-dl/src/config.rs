//! Immutable dataset configuration types.

use crate::common::*;

/// The task fixed at dataset construction. It determines whether mask
/// fields are populated on returned samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Classification,
    Segmentation,
}

impl TaskType {
    pub fn is_segmentation(&self) -> bool {
        matches!(self, Self::Segmentation)
    }
}

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub height: i64,
    pub width: i64,
}

impl ImageSize {
    pub fn new(height: i64, width: i64) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            Error::configuration(format!("image size {}x{} is not positive", height, width))
        );
        Ok(Self { height, width })
    }

    pub fn square(size: i64) -> Result<Self> {
        Self::new(size, size)
    }

    pub fn hw(&self) -> [i64; 2] {
        [self.height, self.width]
    }
}

/// Batch size and worker count hints. They are carried for an external
/// data loader and are not consumed by the datasets themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default = "default_batch_size")]
    pub train_batch_size: NonZeroUsize,
    #[serde(default = "default_batch_size")]
    pub eval_batch_size: NonZeroUsize,
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            train_batch_size: default_batch_size(),
            eval_batch_size: default_batch_size(),
            num_workers: default_num_workers(),
        }
    }
}

fn default_batch_size() -> NonZeroUsize {
    NonZeroUsize::new(32).unwrap()
}

fn default_num_workers() -> usize {
    8
}
