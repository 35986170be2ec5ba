use super::*;
use crate::{
    common::*,
    config::{ImageSize, LoaderConfig, TaskType},
    transform::{default_transform, Transform},
};

/// Options of the MVTec 3D-AD dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MVTec3DConfig {
    pub root: PathBuf,
    /// The object class to load, e.g. `bagel`.
    pub category: String,
    pub image_size: ImageSize,
    pub task: TaskType,
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// The MVTec 3D-AD dataset.
///
/// Each defect directory under
/// `root/<category>/{train,test,validation}` holds parallel `rgb/`,
/// `gt/` and `xyz/` folders; samples pair the color image with its
/// ground-truth mask and depth map by file stem. The `validation`
/// folder counts towards the test split.
#[derive(Debug)]
pub struct MVTec3DDataset {
    config: MVTec3DConfig,
    transform: Arc<dyn Transform>,
    records: Option<Vec<Arc<FileRecord>>>,
}

impl MVTec3DDataset {
    pub fn new(config: MVTec3DConfig) -> Result<Self> {
        let transform = default_transform(config.image_size);
        Self::with_transform(config, transform)
    }

    pub fn with_transform(config: MVTec3DConfig, transform: Arc<dyn Transform>) -> Result<Self> {
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
        self.config.root.join(&self.config.category)
    }

    fn rules(&self) -> Result<Vec<DirRule>> {
        let category_dir = self.category_dir();
        let splits = [
            ("train", Split::Train),
            ("test", Split::Test),
            ("validation", Split::Test),
        ];

        let mut rules = vec![];
        for (split_name, split) in splits {
            let split_dir = category_dir.join(split_name);
            if !split_dir.is_dir() {
                continue;
            }

            let mut defect_dirs: Vec<PathBuf> =
                glob::glob(&format!("{}/*", split_dir.display()))?.try_collect()?;
            defect_dirs.retain(|path| path.is_dir());
            defect_dirs.sort();

            for defect_dir in defect_dirs {
                let label = match defect_dir.file_name().and_then(|name| name.to_str()) {
                    Some("good") => Label::Normal,
                    _ => Label::Abnormal,
                };
                let gt_dir = defect_dir.join("gt");
                let xyz_dir = defect_dir.join("xyz");

                let mut rule = DirRule::new(defect_dir.join("rgb"), split, label)
                    .with_depth_fn(move |image| resolve_by_stem(&xyz_dir, image));
                if label.is_abnormal() {
                    rule = rule.with_mask_fn(move |image| resolve_by_stem(&gt_dir, image));
                }
                rules.push(rule);
            }
        }

        Ok(rules)
    }
}

impl GenericDataset for MVTec3DDataset {
    fn task(&self) -> TaskType {
        self.config.task
    }

    fn image_size(&self) -> ImageSize {
        self.config.image_size
    }
}

impl DatasetLifecycle for MVTec3DDataset {
    fn prepare_data(&self) -> Result<()> {
        ensure!(
            self.category_dir().is_dir(),
            Error::data_not_found(
                self.category_dir(),
                format!("category '{}' not found", self.config.category)
            )
        );
        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        let records = scan(&self.rules()?)?;
        validate_records(&records, self.config.task, &self.category_dir())?;
        self.records = Some(records);
        Ok(())
    }

    fn is_setup(&self) -> bool {
        self.records.is_some()
    }
}

impl FileDataset for MVTec3DDataset {
    fn records(&self) -> Result<&[Arc<FileRecord>]> {
        let records = self.records.as_deref().ok_or(Error::NotSetUp)?;
        Ok(records)
    }
}

impl RandomAccessDataset for MVTec3DDataset {
    fn num_records(&self) -> usize {
        self.records.as_deref().map(|records| records.len()).unwrap_or(0)
    }

    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<Sample>> + Send>> {
        let record = get_record(&self.records, index);
        load_sample(record, self.config.task, self.transform.clone())
    }
}
