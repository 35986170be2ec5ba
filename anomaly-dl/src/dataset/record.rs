use crate::common::*;

/// The binary ground-truth label of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Normal,
    Abnormal,
}

impl Label {
    pub fn is_abnormal(&self) -> bool {
        matches!(self, Self::Abnormal)
    }

    pub fn index(&self) -> i64 {
        match self {
            Self::Normal => 0,
            Self::Abnormal => 1,
        }
    }
}

/// The split a file was discovered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Test,
}

/// The record with file locations and label, but without pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    pub image_path: PathBuf,
    pub split: Split,
    /// Absent for prediction datasets with no ground truth.
    pub label: Option<Label>,
    pub mask_path: Option<PathBuf>,
    /// Depth map location, populated by depth datasets only.
    pub depth_path: Option<PathBuf>,
}

/// The record with pixels loaded and the transform applied.
#[derive(Debug)]
pub struct Sample {
    pub image: Tensor,
    pub image_path: PathBuf,
    pub label: Option<Label>,
    /// Populated for segmentation tasks only.
    pub mask: Option<Tensor>,
    pub mask_path: Option<PathBuf>,
    pub depth: Option<Tensor>,
    pub depth_path: Option<PathBuf>,
}
