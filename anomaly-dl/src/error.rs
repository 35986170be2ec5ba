//! Error taxonomy of the dataset and deployment toolkit.

use crate::common::*;

/// The error classes surfaced by datasets, transforms and inferencers.
///
/// Errors are wrapped in [`anyhow::Error`] on the way out, so callers
/// that care about the class downcast with [`anyhow::Error::downcast_ref`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration, e.g. segmentation task without a mask
    /// source, or a non-positive image size.
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// The root exists but yields no samples, or does not exist at all.
    #[error("no data found under '{}': {reason}", .path.display())]
    DataNotFound { path: PathBuf, reason: String },

    /// Sample access was attempted before `prepare_data()` and `setup()`.
    #[error("dataset is not set up; call prepare_data() and setup() first")]
    NotSetUp,

    /// An image or mask file could not be read at access time.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: tch::TchError,
    },

    /// The transform produced an output of unexpected shape.
    #[error("transform produced unexpected output: {reason}")]
    Transform { reason: String },
}

impl Error {
    pub fn configuration(reason: impl ToString) -> Self {
        Self::Configuration {
            reason: reason.to_string(),
        }
    }

    pub fn data_not_found(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DataNotFound {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: tch::TchError) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn transform(reason: impl ToString) -> Self {
        Self::Transform {
            reason: reason.to_string(),
        }
    }
}
