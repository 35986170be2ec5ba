use super::ModelMetadata;
use crate::{common::*, config::TaskType, model::GaussianModel};

/// Export the model for the framework's own inference path: one
/// self-contained weights file with the metadata folded into the named
/// tensors.
pub fn export_to_native(
    model: &GaussianModel,
    task: TaskType,
    export_root: impl AsRef<Path>,
) -> Result<PathBuf> {
    let export_dir = export_root.as_ref().join("native");
    fs::create_dir_all(&export_dir)?;
    let weights_path = export_dir.join("model.pt");

    Tensor::save_multi(
        &[
            ("mean", &model.mean),
            ("var", &model.var),
            ("image_size", &Tensor::of_slice(&model.image_size.hw())),
            (
                "image_threshold",
                &Tensor::of_slice(&[model.image_threshold]),
            ),
            (
                "pixel_threshold",
                &Tensor::of_slice(&[model.pixel_threshold]),
            ),
            ("task", &Tensor::of_slice(&[task_index(task)])),
        ],
        &weights_path,
    )
    .map_err(|err| Error::io(&weights_path, err))?;

    info!("exported native model to '{}'", weights_path.display());
    Ok(weights_path)
}

/// Export the model for a portable inference runtime: a weights file
/// plus a JSON metadata file next to it.
pub fn export_to_portable(
    model: &GaussianModel,
    task: TaskType,
    export_root: impl AsRef<Path>,
) -> Result<(PathBuf, PathBuf)> {
    let export_dir = export_root.as_ref().join("portable");
    fs::create_dir_all(&export_dir)?;
    let weights_path = export_dir.join("model.bin");
    let metadata_path = export_dir.join("metadata.json");

    Tensor::save_multi(&[("mean", &model.mean), ("var", &model.var)], &weights_path)
        .map_err(|err| Error::io(&weights_path, err))?;
    ModelMetadata::from_model(model, task).save(&metadata_path)?;

    info!(
        "exported portable model to '{}' with metadata '{}'",
        weights_path.display(),
        metadata_path.display()
    );
    Ok((weights_path, metadata_path))
}

pub(super) fn task_index(task: TaskType) -> i64 {
    match task {
        TaskType::Classification => 0,
        TaskType::Segmentation => 1,
    }
}

pub(super) fn task_from_index(index: i64) -> Result<TaskType> {
    let task = match index {
        0 => TaskType::Classification,
        1 => TaskType::Segmentation,
        _ => bail!(Error::configuration(format!("unknown task index {}", index))),
    };
    Ok(task)
}
