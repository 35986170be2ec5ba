//! Dataset abstraction layer.
//!
//! Every variant follows the same three-phase lifecycle: construct with
//! an immutable configuration, `prepare_data()` to make sure the raw
//! data is on disk, then `setup()` to scan the filesystem into an
//! ordered record list. Datasets are read-only afterwards, so indexed
//! access is safe from any number of worker tasks without locking.

mod dataset_;
mod folder;
mod kolektor;
mod mvtec3d;
mod predict;
mod record;
mod streaming;
mod utils;
mod visa;

pub use dataset_::*;
pub use folder::*;
pub use kolektor::*;
pub use mvtec3d::*;
pub use predict::*;
pub use record::*;
pub use streaming::*;
pub use utils::*;
pub use visa::*;
