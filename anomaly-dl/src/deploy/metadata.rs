use crate::{common::*, config::ImageSize, config::TaskType, model::GaussianModel};

/// Metadata shipped alongside exported weights so an inference runtime
/// can reproduce the preprocessing and thresholding of the training
/// run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub task: TaskType,
    pub image_size: ImageSize,
    pub image_threshold: f64,
    pub pixel_threshold: f64,
}

impl ModelMetadata {
    pub fn from_model(model: &GaussianModel, task: TaskType) -> Self {
        Self {
            task,
            image_size: model.image_size,
            image_threshold: model.image_threshold,
            pixel_threshold: model.pixel_threshold,
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read metadata file '{}'", path.display()))?;
        let metadata = serde_json::from_str(&text)?;
        Ok(metadata)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
