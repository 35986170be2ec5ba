use super::{export::task_from_index, ModelMetadata};
use crate::{
    common::*,
    config::{ImageSize, TaskType},
    dataset::Label,
    model::GaussianModel,
};

/// The outcome of one inference call.
#[derive(Debug)]
pub struct Prediction {
    /// The `(height, width)` anomaly map at the model input size.
    pub anomaly_map: Tensor,
    pub score: f64,
    pub label: Label,
}

/// Loads a native export and runs the framework's own inference path.
#[derive(Debug)]
pub struct NativeInferencer {
    model: GaussianModel,
    metadata: ModelMetadata,
}

impl NativeInferencer {
    pub fn load(weights: impl AsRef<Path>) -> Result<Self> {
        let weights = weights.as_ref();
        let tensors: HashMap<String, Tensor> = Tensor::load_multi(weights)
            .map_err(|err| Error::io(weights, err))?
            .into_iter()
            .collect();
        let get = |name: &str| {
            tensors.get(name).ok_or_else(|| {
                format_err!("weights '{}' miss tensor '{}'", weights.display(), name)
            })
        };

        let size_tensor = get("image_size")?;
        let image_size = ImageSize::new(
            size_tensor.int64_value(&[0]),
            size_tensor.int64_value(&[1]),
        )?;
        let image_threshold = f64::from(get("image_threshold")?);
        let pixel_threshold = f64::from(get("pixel_threshold")?);
        let task = task_from_index(get("task")?.int64_value(&[0]))?;

        let model = GaussianModel {
            mean: get("mean")?.shallow_clone(),
            var: get("var")?.shallow_clone(),
            image_size,
            image_threshold,
            pixel_threshold,
        };
        let metadata = ModelMetadata::from_model(&model, task);

        Ok(Self { model, metadata })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn predict(&self, image_path: impl AsRef<Path>) -> Result<Prediction> {
        predict(&self.model, &self.metadata, image_path.as_ref())
    }
}

/// Loads a portable export: a weights file plus its JSON metadata.
#[derive(Debug)]
pub struct PortableInferencer {
    model: GaussianModel,
    metadata: ModelMetadata,
}

impl PortableInferencer {
    /// When `metadata` is `None`, `metadata.json` next to the weights
    /// file is assumed.
    pub fn load(
        weights: impl AsRef<Path>,
        metadata: impl Into<Option<PathBuf>>,
    ) -> Result<Self> {
        let weights = weights.as_ref();
        let metadata_path = metadata.into().unwrap_or_else(|| {
            weights
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("metadata.json")
        });
        let metadata = ModelMetadata::open(&metadata_path)?;

        let tensors: HashMap<String, Tensor> = Tensor::load_multi(weights)
            .map_err(|err| Error::io(weights, err))?
            .into_iter()
            .collect();
        let get = |name: &str| {
            tensors.get(name).ok_or_else(|| {
                format_err!("weights '{}' miss tensor '{}'", weights.display(), name)
            })
        };

        let model = GaussianModel {
            mean: get("mean")?.shallow_clone(),
            var: get("var")?.shallow_clone(),
            image_size: metadata.image_size,
            image_threshold: metadata.image_threshold,
            pixel_threshold: metadata.pixel_threshold,
        };

        Ok(Self { model, metadata })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn predict(&self, image_path: impl AsRef<Path>) -> Result<Prediction> {
        predict(&self.model, &self.metadata, image_path.as_ref())
    }
}

fn predict(
    model: &GaussianModel,
    metadata: &ModelMetadata,
    image_path: &Path,
) -> Result<Prediction> {
    let ImageSize { height, width } = metadata.image_size;

    let image = tch::no_grad(|| -> Result<_> {
        let image = vision::image::load(image_path).map_err(|err| Error::io(image_path, err))?;
        let image = vision::image::resize(&image, width, height)
            .map_err(|err| Error::io(image_path, err))?
            .to_kind(Kind::Float)
            / 255.0;
        Ok(image)
    })?;

    let anomaly_map = model.anomaly_map(&image)?;
    let score = model.image_score(&anomaly_map);
    let label = if score > metadata.image_threshold {
        Label::Abnormal
    } else {
        Label::Normal
    };

    info!(
        "'{}': score {:.5}, label {:?}",
        image_path.display(),
        score,
        label
    );

    Ok(Prediction {
        anomaly_map,
        score,
        label,
    })
}

/// Render an anomaly map as an 8-bit gray heat map image.
pub fn save_anomaly_map(anomaly_map: &Tensor, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    let image = tch::no_grad(|| {
        let min = f64::from(anomaly_map.min());
        let max = f64::from(anomaly_map.max());
        let normalized = if max > min {
            (anomaly_map - min) / (max - min)
        } else {
            anomaly_map.zeros_like()
        };
        let gray = (normalized * 255.0).to_kind(Kind::Uint8);
        Tensor::stack(&[&gray, &gray, &gray], 0)
    });

    vision::image::save(&image, path)
        .map_err(|err| Error::io(path, err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_anomaly_map_is_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");

        let map = Tensor::rand(&[64, 64], FLOAT_CPU);
        save_anomaly_map(&map, &path).unwrap();

        let image = vision::image::load(&path).unwrap();
        assert_eq!(image.size(), &[3, 64, 64]);
    }

    #[test]
    fn constant_anomaly_map_saves_without_division_by_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.png");

        let map = Tensor::ones(&[16, 16], FLOAT_CPU);
        save_anomaly_map(&map, &path).unwrap();
        assert!(path.is_file());
    }
}
