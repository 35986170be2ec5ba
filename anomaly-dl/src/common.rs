pub use anyhow::{bail, ensure, format_err, Context as _, Result};
pub use futures::{
    future,
    future::FutureExt as _,
    stream::{self, Stream, StreamExt as _, TryStreamExt as _},
};
pub use itertools::Itertools as _;
pub use log::{info, warn};
pub use serde::{Deserialize, Serialize};
pub use std::{
    borrow::Borrow,
    cmp::Ordering,
    collections::HashMap,
    fmt,
    fmt::Debug,
    fs,
    future::Future,
    iter,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    pin::Pin,
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};
pub use tch::{kind::FLOAT_CPU, vision, Device, IndexOp, Kind, Tensor};

pub use crate::error::Error;
