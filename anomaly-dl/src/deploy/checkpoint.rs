use crate::{common::*, model::GaussianModel};
use chrono::{Local, NaiveDateTime};

pub const FILE_STRFTIME: &str = "%Y-%m-%d-%H-%M-%S.%3f";

/// Save the model to a timestamped checkpoint file in the directory.
pub fn save_checkpoint(
    model: &GaussianModel,
    checkpoint_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let checkpoint_dir = checkpoint_dir.as_ref();
    fs::create_dir_all(checkpoint_dir)?;

    let filename = format!("{}.ckpt", Local::now().format(FILE_STRFTIME));
    let path = checkpoint_dir.join(filename);
    model.save(&path)?;
    info!("saved checkpoint file '{}'", path.display());
    Ok(path)
}

/// Find the most recent checkpoint file in the directory, if any.
pub fn latest_checkpoint(checkpoint_dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let pattern = format!("{}/*.ckpt", checkpoint_dir.as_ref().display());
    let paths: Vec<PathBuf> = glob::glob(&pattern)?.try_collect()?;

    let latest = paths
        .into_iter()
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?;
            let datetime = NaiveDateTime::parse_from_str(stem, FILE_STRFTIME).ok()?;
            Some((path, datetime))
        })
        .max_by_key(|(_path, datetime)| *datetime)
        .map(|(path, _datetime)| path);

    if latest.is_none() {
        warn!(
            "no checkpoint file found under '{}'",
            checkpoint_dir.as_ref().display()
        );
    }

    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageSize;

    #[test]
    fn latest_checkpoint_finds_saved_file() {
        let dir = tempfile::tempdir().unwrap();

        assert!(latest_checkpoint(dir.path()).unwrap().is_none());

        let model = GaussianModel {
            mean: Tensor::zeros(&[3, 8, 8], FLOAT_CPU),
            var: Tensor::ones(&[3, 8, 8], FLOAT_CPU),
            image_size: ImageSize::square(8).unwrap(),
            image_threshold: 1.0,
            pixel_threshold: 1.0,
        };
        let saved = save_checkpoint(&model, dir.path()).unwrap();

        let found = latest_checkpoint(dir.path()).unwrap().unwrap();
        assert_eq!(found, saved);
    }
}
