//! A per-pixel Gaussian anomaly model.
//!
//! The model keeps channel-wise pixel statistics fitted over the
//! normal training samples; the anomaly map of an image is its
//! variance-scaled squared distance to the mean image. It is the
//! smallest model that makes checkpoints and exports exercisable.

use crate::{
    common::*,
    config::ImageSize,
    dataset::{FileDataset, GenericDataset, Label, RandomAccessDataset, Split},
};

const MIN_VARIANCE: f64 = 1e-6;

#[derive(Debug)]
pub struct GaussianModel {
    /// Mean image, `(3, height, width)` float.
    pub mean: Tensor,
    /// Per-pixel variance, same shape as the mean.
    pub var: Tensor,
    pub image_size: ImageSize,
    /// Highest image score seen during fitting.
    pub image_threshold: f64,
    /// Highest pixel score seen during fitting.
    pub pixel_threshold: f64,
}

impl GaussianModel {
    /// Fit the statistics over the normal training samples of a
    /// dataset, then derive the thresholds from the training scores.
    pub async fn fit<D>(dataset: &D) -> Result<Self>
    where
        D: FileDataset + RandomAccessDataset,
    {
        let image_size = dataset.image_size();
        let train_indexes: Vec<_> = dataset
            .records()?
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                record.split == Split::Train && record.label != Some(Label::Abnormal)
            })
            .map(|(index, _)| index)
            .collect();
        ensure!(
            !train_indexes.is_empty(),
            Error::configuration("no normal training samples to fit on")
        );

        let mut sum: Option<Tensor> = None;
        let mut sq_sum: Option<Tensor> = None;

        for &index in &train_indexes {
            let image = dataset.nth(index).await?.image;
            ensure!(
                image.size().len() == 3 && image.size()[0] == 3,
                Error::transform(format!(
                    "fitting expects channel-first images, got shape {:?}",
                    image.size()
                ))
            );

            sum = Some(match sum {
                Some(sum) => sum + &image,
                None => image.shallow_clone(),
            });
            sq_sum = Some(match sq_sum {
                Some(sq_sum) => sq_sum + &image * &image,
                None => &image * &image,
            });
        }

        let count = train_indexes.len() as f64;
        let mean = sum.unwrap() / count;
        let var = (sq_sum.unwrap() / count - &mean * &mean).clamp_min(MIN_VARIANCE);

        let mut model = Self {
            mean,
            var,
            image_size,
            image_threshold: 0.0,
            pixel_threshold: 0.0,
        };

        // second pass: thresholds are the extreme training scores
        let mut image_threshold = f64::MIN;
        let mut pixel_threshold = f64::MIN;
        for &index in &train_indexes {
            let image = dataset.nth(index).await?.image;
            let map = model.anomaly_map(&image)?;
            image_threshold = image_threshold.max(model.image_score(&map));
            pixel_threshold = pixel_threshold.max(f64::from(map.max()));
        }
        model.image_threshold = image_threshold;
        model.pixel_threshold = pixel_threshold;

        Ok(model)
    }

    /// The `(height, width)` anomaly map of a channel-first image.
    pub fn anomaly_map(&self, image: &Tensor) -> Result<Tensor> {
        ensure!(
            image.size() == self.mean.size(),
            Error::transform(format!(
                "image shape {:?} does not match model shape {:?}",
                image.size(),
                self.mean.size()
            ))
        );

        let map = tch::no_grad(|| {
            let diff = image - &self.mean;
            let sq = &diff * &diff / &self.var;
            (sq.select(0, 0) + sq.select(0, 1) + sq.select(0, 2)) / 3.0
        });
        Ok(map)
    }

    pub fn image_score(&self, anomaly_map: &Tensor) -> f64 {
        f64::from(anomaly_map.max())
    }

    /// Save the model as named tensors at the given path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let Self {
            mean,
            var,
            image_size,
            image_threshold,
            pixel_threshold,
        } = self;

        Tensor::save_multi(
            &[
                ("mean", mean),
                ("var", var),
                ("image_size", &Tensor::of_slice(&image_size.hw())),
                ("image_threshold", &Tensor::of_slice(&[*image_threshold])),
                ("pixel_threshold", &Tensor::of_slice(&[*pixel_threshold])),
            ],
            path,
        )
        .map_err(|err| Error::io(path, err))?;
        Ok(())
    }

    pub fn load_from_checkpoint(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let tensors: HashMap<String, Tensor> = Tensor::load_multi(path)
            .map_err(|err| Error::io(path, err))?
            .into_iter()
            .collect();
        let get = |name: &str| {
            tensors.get(name).ok_or_else(|| {
                format_err!("checkpoint '{}' misses tensor '{}'", path.display(), name)
            })
        };

        let size_tensor = get("image_size")?;
        let image_size = ImageSize::new(
            size_tensor.int64_value(&[0]),
            size_tensor.int64_value(&[1]),
        )?;

        Ok(Self {
            mean: get("mean")?.shallow_clone(),
            var: get("var")?.shallow_clone(),
            image_size,
            image_threshold: f64::from(get("image_threshold")?),
            pixel_threshold: f64::from(get("pixel_threshold")?),
        })
    }
}
