use super::*;
use crate::{
    common::*,
    config::{ImageSize, LoaderConfig, TaskType},
    transform::{default_transform, Transform},
};

/// Options of the folder dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderConfig {
    pub root: PathBuf,
    /// Directory of normal training images, relative to the root
    /// unless absolute.
    pub normal_dir: PathBuf,
    /// Directory of abnormal test images.
    #[serde(default)]
    pub abnormal_dir: Option<PathBuf>,
    /// Directory of normal test images.
    #[serde(default)]
    pub normal_test_dir: Option<PathBuf>,
    /// Directory of ground-truth masks paired to the abnormal images
    /// by file stem. Required for segmentation tasks.
    #[serde(default)]
    pub mask_dir: Option<PathBuf>,
    pub image_size: ImageSize,
    pub task: TaskType,
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// The dataset that loads samples from caller-specified directories.
#[derive(Debug)]
pub struct FolderDataset {
    config: FolderConfig,
    transform: Arc<dyn Transform>,
    records: Option<Vec<Arc<FileRecord>>>,
}

impl FolderDataset {
    pub fn new(config: FolderConfig) -> Result<Self> {
        let transform = default_transform(config.image_size);
        Self::with_transform(config, transform)
    }

    pub fn with_transform(config: FolderConfig, transform: Arc<dyn Transform>) -> Result<Self> {
        ensure!(
            !(config.task.is_segmentation() && config.mask_dir.is_none()),
            Error::configuration("segmentation task requires a mask_dir")
        );
        ensure!(
            !(config.task.is_segmentation() && config.abnormal_dir.is_none()),
            Error::configuration("segmentation task requires an abnormal_dir")
        );

        Ok(Self {
            config,
            transform,
            records: None,
        })
    }

    fn rules(&self) -> Vec<DirRule> {
        let FolderConfig {
            root,
            normal_dir,
            abnormal_dir,
            normal_test_dir,
            mask_dir,
            ..
        } = &self.config;

        let mut rules = vec![DirRule::new(
            resolve_dir(root, normal_dir),
            Split::Train,
            Label::Normal,
        )];

        if let Some(normal_test_dir) = normal_test_dir {
            rules.push(DirRule::new(
                resolve_dir(root, normal_test_dir),
                Split::Test,
                Label::Normal,
            ));
        }

        if let Some(abnormal_dir) = abnormal_dir {
            let mut rule = DirRule::new(
                resolve_dir(root, abnormal_dir),
                Split::Test,
                Label::Abnormal,
            );
            if let Some(mask_dir) = mask_dir {
                let mask_dir = resolve_dir(root, mask_dir);
                rule = rule.with_mask_fn(move |image| resolve_by_stem(&mask_dir, image));
            }
            rules.push(rule);
        }

        rules
    }
}

impl GenericDataset for FolderDataset {
    fn task(&self) -> TaskType {
        self.config.task
    }

    fn image_size(&self) -> ImageSize {
        self.config.image_size
    }
}

impl DatasetLifecycle for FolderDataset {
    fn prepare_data(&self) -> Result<()> {
        // folder datasets are user-supplied, nothing to fetch
        ensure!(
            self.config.root.is_dir(),
            Error::data_not_found(&self.config.root, "root directory does not exist")
        );
        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        let records = scan(&self.rules())?;
        validate_records(&records, self.config.task, &self.config.root)?;
        self.records = Some(records);
        Ok(())
    }

    fn is_setup(&self) -> bool {
        self.records.is_some()
    }
}

impl FileDataset for FolderDataset {
    fn records(&self) -> Result<&[Arc<FileRecord>]> {
        let records = self.records.as_deref().ok_or(Error::NotSetUp)?;
        Ok(records)
    }
}

impl RandomAccessDataset for FolderDataset {
    fn num_records(&self) -> usize {
        self.records.as_deref().map(|records| records.len()).unwrap_or(0)
    }

    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<Sample>> + Send>> {
        let record = get_record(&self.records, index);
        load_sample(record, self.config.task, self.transform.clone())
    }
}
