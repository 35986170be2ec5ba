use super::*;
use crate::{
    common::*,
    config::{ImageSize, TaskType},
    transform::{default_transform, Transform},
};

/// The dataset over images awaiting prediction: a directory of images
/// or a single image file. Samples carry no label and no mask.
#[derive(Debug)]
pub struct PredictDataset {
    path: PathBuf,
    image_size: ImageSize,
    transform: Arc<dyn Transform>,
    records: Option<Vec<Arc<FileRecord>>>,
}

impl PredictDataset {
    pub fn new(path: impl Into<PathBuf>, image_size: ImageSize) -> Result<Self> {
        let transform = default_transform(image_size);
        Ok(Self {
            path: path.into(),
            image_size,
            transform,
            records: None,
        })
    }

    /// Replace the default resize transform. The transform decides the
    /// output size and channel ordering from here on.
    pub fn with_transform(mut self, transform: Arc<dyn Transform>) -> Self {
        self.transform = transform;
        self
    }
}

impl GenericDataset for PredictDataset {
    fn task(&self) -> TaskType {
        TaskType::Classification
    }

    fn image_size(&self) -> ImageSize {
        self.image_size
    }
}

impl DatasetLifecycle for PredictDataset {
    fn prepare_data(&self) -> Result<()> {
        ensure!(
            self.path.exists(),
            Error::data_not_found(&self.path, "input path does not exist")
        );
        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        let image_paths = if self.path.is_file() {
            ensure!(
                has_image_extension(&self.path),
                Error::configuration(format!("'{}' is not an image file", self.path.display()))
            );
            vec![self.path.clone()]
        } else {
            list_images(&self.path, false)?
        };

        let records: Vec<_> = image_paths
            .into_iter()
            .map(|image_path| {
                Arc::new(FileRecord {
                    image_path,
                    split: Split::Test,
                    label: None,
                    mask_path: None,
                    depth_path: None,
                })
            })
            .collect();

        validate_records(&records, TaskType::Classification, &self.path)?;
        self.records = Some(records);
        Ok(())
    }

    fn is_setup(&self) -> bool {
        self.records.is_some()
    }
}

impl FileDataset for PredictDataset {
    fn records(&self) -> Result<&[Arc<FileRecord>]> {
        let records = self.records.as_deref().ok_or(Error::NotSetUp)?;
        Ok(records)
    }
}

impl RandomAccessDataset for PredictDataset {
    fn num_records(&self) -> usize {
        self.records.as_deref().map(|records| records.len()).unwrap_or(0)
    }

    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<Sample>> + Send>> {
        let record = get_record(&self.records, index);
        load_sample(record, TaskType::Classification, self.transform.clone())
    }
}
