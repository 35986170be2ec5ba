use super::*;
use crate::{common::*, config::TaskType, transform::Transform};
use derivative::Derivative;

/// Extensions accepted by the directory scan, matched case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

pub(super) type PathResolver = Box<dyn Fn(&Path) -> Option<PathBuf> + Send + Sync>;

/// One directory to enumerate, plus the rules applied to every image
/// found in it. The variants differ only in the rules they build.
#[derive(Derivative)]
#[derivative(Debug)]
pub(super) struct DirRule {
    pub dir: PathBuf,
    pub recursive: bool,
    pub split: Split,
    pub label: Option<Label>,
    #[derivative(Debug = "ignore")]
    pub mask_fn: Option<PathResolver>,
    #[derivative(Debug = "ignore")]
    pub depth_fn: Option<PathResolver>,
}

impl DirRule {
    pub fn new(dir: impl Into<PathBuf>, split: Split, label: impl Into<Option<Label>>) -> Self {
        Self {
            dir: dir.into(),
            recursive: false,
            split,
            label: label.into(),
            mask_fn: None,
            depth_fn: None,
        }
    }

    pub fn with_mask_fn(
        mut self,
        mask_fn: impl Fn(&Path) -> Option<PathBuf> + Send + Sync + 'static,
    ) -> Self {
        self.mask_fn = Some(Box::new(mask_fn));
        self
    }

    pub fn with_depth_fn(
        mut self,
        depth_fn: impl Fn(&Path) -> Option<PathBuf> + Send + Sync + 'static,
    ) -> Self {
        self.depth_fn = Some(Box::new(depth_fn));
        self
    }
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// List the image files in a directory in lexicographic order.
pub fn list_images(dir: impl AsRef<Path>, recursive: bool) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    ensure!(
        dir.is_dir(),
        Error::data_not_found(dir, "not a directory")
    );

    let pattern = if recursive {
        format!("{}/**/*", dir.display())
    } else {
        format!("{}/*", dir.display())
    };
    let mut paths: Vec<PathBuf> = glob::glob(&pattern)?.try_collect()?;
    paths.retain(|path| path.is_file() && has_image_extension(path));
    paths.sort();
    Ok(paths)
}

/// Resolve a mask or depth file for an image by file stem. Both the
/// bare stem and the `<stem>_mask` convention are tried against every
/// known extension.
pub fn resolve_by_stem(dir: &Path, image_path: &Path) -> Option<PathBuf> {
    let stem = image_path.file_stem()?.to_str()?;
    let stems = [stem.to_owned(), format!("{}_mask", stem)];
    stems
        .iter()
        .cartesian_product(IMAGE_EXTENSIONS)
        .map(|(stem, ext)| dir.join(format!("{}.{}", stem, ext)))
        .find(|path| path.is_file())
}

/// Join a configured directory onto the root unless it is absolute.
pub fn resolve_dir(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_owned()
    } else {
        root.join(dir)
    }
}

/// The shared enumeration strategy. Rules are scanned in order and the
/// files within each rule are sorted, so the outcome is stable across
/// repeated setups over unchanged root contents.
pub(super) fn scan(rules: &[DirRule]) -> Result<Vec<Arc<FileRecord>>> {
    let records: Vec<_> = rules
        .iter()
        .map(|rule| -> Result<_> {
            let images = list_images(&rule.dir, rule.recursive)?;
            let records: Vec<_> = images
                .into_iter()
                .map(|image_path| {
                    let mask_path = rule.mask_fn.as_ref().and_then(|f| f(&image_path));
                    let depth_path = rule.depth_fn.as_ref().and_then(|f| f(&image_path));
                    Arc::new(FileRecord {
                        image_path,
                        split: rule.split,
                        label: rule.label,
                        mask_path,
                        depth_path,
                    })
                })
                .collect();
            Ok(records)
        })
        .flatten_ok()
        .try_collect()?;
    Ok(records)
}

/// Post-scan validation shared by every variant: the scan must find at
/// least one sample, and in segmentation mode every abnormal sample
/// must come with a resolvable mask.
pub(super) fn validate_records(
    records: &[Arc<FileRecord>],
    task: TaskType,
    root: &Path,
) -> Result<()> {
    if records.is_empty() {
        bail!(Error::data_not_found(root, "the scan found no samples"));
    }

    if task.is_segmentation() {
        for record in records {
            if record.label != Some(Label::Abnormal) {
                continue;
            }
            let ok = record
                .mask_path
                .as_deref()
                .map(Path::is_file)
                .unwrap_or(false);
            ensure!(
                ok,
                Error::configuration(format!(
                    "segmentation task but no mask could be paired to '{}'",
                    record.image_path.display()
                ))
            );
        }
    }

    Ok(())
}

/// Look up the nth record, failing fast before setup and on an
/// out-of-range index.
pub(super) fn get_record(
    records: &Option<Vec<Arc<FileRecord>>>,
    index: usize,
) -> Result<Arc<FileRecord>> {
    let records = records.as_deref().ok_or(Error::NotSetUp)?;
    records
        .get(index)
        .cloned()
        .ok_or_else(|| format_err!("invalid index {}", index))
}

/// Load one sample on a blocking task: read the image (and mask when
/// the task asks for one), apply the transform, and check the output
/// shape.
pub(super) fn load_sample(
    record: Result<Arc<FileRecord>>,
    task: TaskType,
    transform: Arc<dyn Transform>,
) -> Pin<Box<dyn Future<Output = Result<Sample>> + Send>> {
    Box::pin(async move {
        let record = record?;

        let sample = async_std::task::spawn_blocking(move || -> Result<Sample> {
            tch::no_grad(|| -> Result<Sample> {
                let FileRecord {
                    image_path,
                    label,
                    mask_path,
                    depth_path,
                    ..
                } = (*record).clone();

                let image = vision::image::load(&image_path)
                    .map_err(|err| Error::io(&image_path, err))?;

                let mask = match (&task, &mask_path) {
                    (TaskType::Segmentation, Some(path)) => {
                        Some(vision::image::load(path).map_err(|err| Error::io(path, err))?)
                    }
                    _ => None,
                };

                let output = transform.apply(image, mask)?;
                check_image_shape(&output.image)?;

                let depth = depth_path
                    .as_deref()
                    .map(|path| -> Result<_> {
                        let depth =
                            vision::image::load(path).map_err(|err| Error::io(path, err))?;
                        Ok(transform.apply(depth, None)?.image)
                    })
                    .transpose()?;

                Ok(Sample {
                    image: output.image,
                    image_path,
                    label,
                    mask: output.mask,
                    mask_path: task.is_segmentation().then(|| mask_path).flatten(),
                    depth,
                    depth_path,
                })
            })
        })
        .await?;

        Ok(sample)
    })
}

fn check_image_shape(image: &Tensor) -> Result<()> {
    let size = image.size();
    let ok = size.len() == 3 && (size[0] == 3 || size[2] == 3);
    ensure!(
        ok,
        Error::transform(format!(
            "expected a 3-channel image tensor, got shape {:?}",
            size
        ))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extension_filter() {
        assert!(has_image_extension(Path::new("a/b/000.png")));
        assert!(has_image_extension(Path::new("a/b/000.JPG")));
        assert!(!has_image_extension(Path::new("a/b/notes.txt")));
        assert!(!has_image_extension(Path::new("a/b/no_extension")));
    }

    #[test]
    fn list_images_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "c.txt", "d.PNG"] {
            fs::write(dir.path().join(name), b"stub").unwrap();
        }
        let images = list_images(dir.path(), false).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|path| path.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, &["a.jpg", "b.png", "d.PNG"]);
    }

    #[test]
    fn list_images_rejects_missing_dir() {
        let err = list_images("/nonexistent/dataset/dir", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::DataNotFound { .. })
        ));
    }

    #[test]
    fn stem_resolution_tries_mask_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let mask_dir = dir.path().join("ground_truth");
        fs::create_dir_all(&mask_dir).unwrap();
        fs::write(mask_dir.join("000_mask.png"), b"stub").unwrap();

        let resolved = resolve_by_stem(&mask_dir, Path::new("test/bad/000.png")).unwrap();
        assert_eq!(resolved, mask_dir.join("000_mask.png"));
        assert!(resolve_by_stem(&mask_dir, Path::new("test/bad/001.png")).is_none());
    }
}
