use super::*;
use crate::{
    common::*,
    config::{ImageSize, LoaderConfig, TaskType},
    transform::{default_transform, Transform},
};

/// Options of the Kolektor surface-defect dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KolektorConfig {
    pub root: PathBuf,
    pub image_size: ImageSize,
    pub task: TaskType,
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// The Kolektor surface-defect dataset.
///
/// The layout is `root/kos*/Part*.jpg` with a sibling `Part*_GT` mask
/// per image. The dataset ships no split annotation: an image whose
/// ground-truth mask carries no positive pixel is a normal training
/// sample, anything else is an abnormal test sample.
#[derive(Debug)]
pub struct KolektorDataset {
    config: KolektorConfig,
    transform: Arc<dyn Transform>,
    records: Option<Vec<Arc<FileRecord>>>,
}

impl KolektorDataset {
    pub fn new(config: KolektorConfig) -> Result<Self> {
        let transform = default_transform(config.image_size);
        Ok(Self {
            config,
            transform,
            records: None,
        })
    }

    pub fn with_transform(config: KolektorConfig, transform: Arc<dyn Transform>) -> Result<Self> {
        Ok(Self {
            config,
            transform,
            records: None,
        })
    }

    fn item_dirs(&self) -> Result<Vec<PathBuf>> {
        let pattern = format!("{}/kos*", self.config.root.display());
        let mut dirs: Vec<PathBuf> = glob::glob(&pattern)?.try_collect()?;
        dirs.retain(|path| path.is_dir());
        dirs.sort();
        Ok(dirs)
    }
}

fn is_mask(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.ends_with("_GT"))
        .unwrap_or(false)
}

fn mask_of(image_path: &Path) -> Option<PathBuf> {
    let dir = image_path.parent()?;
    let stem = image_path.file_stem()?.to_str()?;
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}_GT.{}", stem, ext)))
        .find(|path| path.is_file())
}

/// An image is anomalous iff its ground-truth mask has any positive
/// pixel.
fn mask_is_anomalous(path: &Path) -> Result<bool> {
    let mask = vision::image::load(path).map_err(|err| Error::io(path, err))?;
    Ok(f64::from(mask.max()) > 0.0)
}

impl GenericDataset for KolektorDataset {
    fn task(&self) -> TaskType {
        self.config.task
    }

    fn image_size(&self) -> ImageSize {
        self.config.image_size
    }
}

impl DatasetLifecycle for KolektorDataset {
    fn prepare_data(&self) -> Result<()> {
        ensure!(
            self.config.root.is_dir(),
            Error::data_not_found(&self.config.root, "root directory does not exist")
        );
        ensure!(
            !self.item_dirs()?.is_empty(),
            Error::data_not_found(&self.config.root, "no kos* item directories found")
        );
        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        let records: Vec<_> = self
            .item_dirs()?
            .into_iter()
            .map(|dir| -> Result<_> {
                let mut images = list_images(&dir, false)?;
                images.retain(|path| !is_mask(path));

                let records: Vec<_> = images
                    .into_iter()
                    .map(|image_path| -> Result<_> {
                        let mask_path = mask_of(&image_path).ok_or_else(|| {
                            Error::configuration(format!(
                                "no ground-truth mask found for '{}'",
                                image_path.display()
                            ))
                        })?;

                        let (split, label) = if mask_is_anomalous(&mask_path)? {
                            (Split::Test, Label::Abnormal)
                        } else {
                            (Split::Train, Label::Normal)
                        };

                        Ok(Arc::new(FileRecord {
                            image_path,
                            split,
                            label: Some(label),
                            mask_path: Some(mask_path),
                            depth_path: None,
                        }))
                    })
                    .try_collect()?;
                Ok(records)
            })
            .flatten_ok()
            .try_collect()?;

        validate_records(&records, self.config.task, &self.config.root)?;
        self.records = Some(records);
        Ok(())
    }

    fn is_setup(&self) -> bool {
        self.records.is_some()
    }
}

impl FileDataset for KolektorDataset {
    fn records(&self) -> Result<&[Arc<FileRecord>]> {
        let records = self.records.as_deref().ok_or(Error::NotSetUp)?;
        Ok(records)
    }
}

impl RandomAccessDataset for KolektorDataset {
    fn num_records(&self) -> usize {
        self.records.as_deref().map(|records| records.len()).unwrap_or(0)
    }

    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<Sample>> + Send>> {
        let record = get_record(&self.records, index);
        load_sample(record, self.config.task, self.transform.clone())
    }
}
