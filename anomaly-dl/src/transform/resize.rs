use super::{Transform, TransformOutput};
use crate::{common::*, config::ImageSize};

/// The channel ordering of the output image tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// `(channels, height, width)`, the native ordering of the codec.
    First,
    /// `(height, width, channels)`.
    Last,
}

/// Resizes the image and mask to a fixed size. The image comes back as
/// float scaled to `[0, 1]`, the mask as a binary `(height, width)`
/// float map.
#[derive(Debug, Clone)]
pub struct Resize {
    size: ImageSize,
    channel_order: ChannelOrder,
}

impl Resize {
    pub fn new(size: ImageSize) -> Self {
        Self {
            size,
            channel_order: ChannelOrder::First,
        }
    }

    /// A resize that emits `(height, width, channels)` tensors, the
    /// convention of channel-last augmentation pipelines.
    pub fn channels_last(size: ImageSize) -> Self {
        Self {
            size,
            channel_order: ChannelOrder::Last,
        }
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }
}

impl Transform for Resize {
    fn apply(&self, image: Tensor, mask: Option<Tensor>) -> Result<TransformOutput> {
        let Self {
            size: ImageSize { height, width },
            channel_order,
        } = *self;

        // the codec resizes in u8; scale float inputs back first
        let image = match image.kind() {
            Kind::Uint8 => image,
            _ => (image * 255.0).to_kind(Kind::Uint8),
        };
        let image = vision::image::resize(&image, width, height)
            .map_err(|err| Error::transform(format!("resize failed: {}", err)))?
            .to_kind(Kind::Float)
            / 255.0;
        let image = match channel_order {
            ChannelOrder::First => image,
            ChannelOrder::Last => image.permute(&[1, 2, 0]),
        };

        let mask = mask
            .map(|mask| -> Result<_> {
                // accept the (H, W) map a previous transform produced
                let mask = match mask.dim() {
                    2 => mask.unsqueeze(0),
                    _ => mask,
                };
                let mask = match mask.kind() {
                    Kind::Uint8 => mask,
                    _ => (mask * 255.0).to_kind(Kind::Uint8),
                };
                let mask = vision::image::resize(&mask, width, height)
                    .map_err(|err| Error::transform(format!("mask resize failed: {}", err)))?;
                // collapse to a single channel and binarize
                let mask = mask.select(0, 0).gt(0).to_kind(Kind::Float);
                Ok(mask)
            })
            .transpose()?;

        Ok(TransformOutput { image, mask })
    }
}
