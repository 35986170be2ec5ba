use super::*;
use crate::{
    common::*,
    config::{ImageSize, TaskType},
};

/// The generic dataset trait.
pub trait GenericDataset
where
    Self: Debug + Send,
{
    /// The task the dataset was constructed for.
    fn task(&self) -> TaskType;

    /// The default output image size.
    fn image_size(&self) -> ImageSize;

    /// The number of color channels of the dataset.
    fn input_channels(&self) -> usize {
        3
    }
}

/// The three-phase lifecycle: Constructed -> Prepared -> Set-up.
pub trait DatasetLifecycle
where
    Self: GenericDataset,
{
    /// Ensure the raw data is present under the root. Idempotent, and
    /// the only phase allowed to write to the filesystem.
    fn prepare_data(&self) -> Result<()>;

    /// Scan the filesystem into the ordered record list. Idempotent:
    /// repeated calls over unchanged root contents yield the same
    /// count and ordering.
    fn setup(&mut self) -> Result<()>;

    fn is_setup(&self) -> bool;
}

/// The dataset with a list of discovered file records.
pub trait FileDataset
where
    Self: GenericDataset,
{
    /// Get the list of records. Fails with [`Error::NotSetUp`] before
    /// `setup()` has run.
    fn records(&self) -> Result<&[Arc<FileRecord>]>;
}

/// The dataset that can be random accessed.
pub trait RandomAccessDataset
where
    Self: GenericDataset,
{
    /// Get number of records in the dataset. Zero before setup.
    fn num_records(&self) -> usize;

    /// Get the nth sample, with the configured transform applied.
    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<Sample>> + Send>>;
}

/// The dataset that can be enumerated through a stream.
pub trait StreamingDataset
where
    Self: GenericDataset,
{
    fn stream(&self) -> Result<Pin<Box<dyn Stream<Item = Result<Sample>> + Send>>>;
}
