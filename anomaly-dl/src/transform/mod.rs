//! Image transform pipeline.

mod resize;

pub use resize::*;

use crate::{common::*, config::ImageSize};

/// The tensors produced by one transform application.
#[derive(Debug)]
pub struct TransformOutput {
    pub image: Tensor,
    pub mask: Option<Tensor>,
}

/// The pluggable transform capability. The dataset hands the raw image
/// (and mask for segmentation) to the transform and returns whatever
/// comes back, so the transform decides the output size and channel
/// ordering.
pub trait Transform
where
    Self: Debug + Send + Sync,
{
    fn apply(&self, image: Tensor, mask: Option<Tensor>) -> Result<TransformOutput>;
}

/// Applies a list of transforms in order.
#[derive(Debug)]
pub struct Compose {
    transforms: Vec<Arc<dyn Transform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Arc<dyn Transform>>) -> Self {
        Self { transforms }
    }
}

impl Transform for Compose {
    fn apply(&self, image: Tensor, mask: Option<Tensor>) -> Result<TransformOutput> {
        self.transforms.iter().try_fold(
            TransformOutput { image, mask },
            |TransformOutput { image, mask }, transform| transform.apply(image, mask),
        )
    }
}

/// The transform applied when the caller supplies none, so that every
/// sample has a deterministic fixed shape.
pub fn default_transform(image_size: ImageSize) -> Arc<dyn Transform> {
    Arc::new(Resize::new(image_size))
}
