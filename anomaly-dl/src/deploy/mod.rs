//! Model checkpointing, export and inference entrypoint support.

mod checkpoint;
mod export;
mod inference;
mod metadata;

pub use checkpoint::*;
pub use export::*;
pub use inference::*;
pub use metadata::*;
