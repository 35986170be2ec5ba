pub use anomaly_dl::deploy::{save_anomaly_map, NativeInferencer, PortableInferencer};
pub use anyhow::{Context as _, Result};
pub use log::info;
pub use std::{
    fs,
    path::{Path, PathBuf},
};
pub use structopt::StructOpt;
