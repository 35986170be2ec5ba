use super::*;
use crate::{
    common::*,
    config::{ImageSize, LoaderConfig, TaskType},
    transform::{default_transform, Transform},
};

/// Options of the Visual Anomaly (VisA) dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisaConfig {
    pub root: PathBuf,
    /// The object class to load, e.g. `candle`.
    pub category: String,
    pub image_size: ImageSize,
    pub task: TaskType,
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// The Visual Anomaly (VisA) dataset.
///
/// Consumes the one-class layout
/// `root/visa_pytorch/<category>/{train,test}/{good,bad}` with masks
/// under `<category>/ground_truth/bad/`, the layout produced by the
/// official split conversion.
#[derive(Debug)]
pub struct VisaDataset {
    config: VisaConfig,
    transform: Arc<dyn Transform>,
    records: Option<Vec<Arc<FileRecord>>>,
}

impl VisaDataset {
    pub fn new(config: VisaConfig) -> Result<Self> {
        let transform = default_transform(config.image_size);
        Self::with_transform(config, transform)
    }

    pub fn with_transform(config: VisaConfig, transform: Arc<dyn Transform>) -> Result<Self> {
        ensure!(
            !config.category.is_empty(),
            Error::configuration("category must not be empty")
        );
        Ok(Self {
            config,
            transform,
            records: None,
        })
    }

    fn category_dir(&self) -> PathBuf {
        self.config
            .root
            .join("visa_pytorch")
            .join(&self.config.category)
    }

    fn rules(&self) -> Vec<DirRule> {
        let category_dir = self.category_dir();
        let mask_dir = category_dir.join("ground_truth").join("bad");

        let mut rules = vec![DirRule::new(
            category_dir.join("train").join("good"),
            Split::Train,
            Label::Normal,
        )];

        let normal_test_dir = category_dir.join("test").join("good");
        if normal_test_dir.is_dir() {
            rules.push(DirRule::new(normal_test_dir, Split::Test, Label::Normal));
        }

        let abnormal_dir = category_dir.join("test").join("bad");
        if abnormal_dir.is_dir() {
            rules.push(
                DirRule::new(abnormal_dir, Split::Test, Label::Abnormal)
                    .with_mask_fn(move |image| resolve_by_stem(&mask_dir, image)),
            );
        }

        rules
    }
}

impl GenericDataset for VisaDataset {
    fn task(&self) -> TaskType {
        self.config.task
    }

    fn image_size(&self) -> ImageSize {
        self.config.image_size
    }
}

impl DatasetLifecycle for VisaDataset {
    fn prepare_data(&self) -> Result<()> {
        // the split conversion is assumed to have run already; verify
        // the per-category layout instead of fetching anything
        ensure!(
            self.category_dir().is_dir(),
            Error::data_not_found(
                self.category_dir(),
                format!(
                    "category '{}' not found under visa_pytorch",
                    self.config.category
                )
            )
        );
        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        let records = scan(&self.rules())?;
        validate_records(&records, self.config.task, &self.category_dir())?;
        self.records = Some(records);
        Ok(())
    }

    fn is_setup(&self) -> bool {
        self.records.is_some()
    }
}

impl FileDataset for VisaDataset {
    fn records(&self) -> Result<&[Arc<FileRecord>]> {
        let records = self.records.as_deref().ok_or(Error::NotSetUp)?;
        Ok(records)
    }
}

impl RandomAccessDataset for VisaDataset {
    fn num_records(&self) -> usize {
        self.records.as_deref().map(|records| records.len()).unwrap_or(0)
    }

    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<Sample>> + Send>> {
        let record = get_record(&self.records, index);
        load_sample(record, self.config.task, self.transform.clone())
    }
}
