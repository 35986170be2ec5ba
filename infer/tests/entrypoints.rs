//! End-to-end checks of the inference entrypoints: fit a small model,
//! export it, and run the command-line `infer` functions against the
//! exported artifacts.

use anomaly_dl::{
    config::{ImageSize, TaskType},
    dataset::{DatasetLifecycle, FolderConfig, FolderDataset},
    deploy::{export_to_native, export_to_portable, latest_checkpoint, save_checkpoint},
    model::GaussianModel,
};
use anyhow::Result;
use std::{
    fs,
    path::{Path, PathBuf},
};
use structopt::StructOpt;
use tch::{kind::FLOAT_CPU, vision, Kind, Tensor};

fn write_image(path: &Path, height: i64, width: i64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let image = (Tensor::rand(&[3, height, width], FLOAT_CPU) * 255.0).to_kind(Kind::Uint8);
    vision::image::save(&image, path).unwrap();
}

fn make_dummy_tree(root: &Path) {
    for index in 0..5 {
        write_image(&root.join(format!("train/good/{:03}.png", index)), 64, 64);
    }
    for index in 0..5 {
        write_image(&root.join(format!("test/bad/{:03}.png", index)), 64, 64);
    }
}

async fn fit_dummy_model(root: PathBuf) -> Result<GaussianModel> {
    let mut dataset = FolderDataset::new(FolderConfig {
        root,
        normal_dir: PathBuf::from("train/good"),
        abnormal_dir: Some(PathBuf::from("test/bad")),
        normal_test_dir: None,
        mask_dir: None,
        image_size: ImageSize::square(64)?,
        task: TaskType::Classification,
        loader: Default::default(),
    })?;
    dataset.prepare_data()?;
    dataset.setup()?;

    GaussianModel::fit(&dataset).await
}

#[async_std::test]
async fn native_inference_entrypoint() {
    let project = tempfile::tempdir().unwrap();
    let root = project.path().join("dataset");
    make_dummy_tree(&root);

    // fit, checkpoint, and reload the way a deployment would
    let model = fit_dummy_model(root.clone()).await.unwrap();
    save_checkpoint(&model, project.path().join("checkpoints")).unwrap();
    let ckpt_path = latest_checkpoint(project.path().join("checkpoints"))
        .unwrap()
        .unwrap();
    let model = GaussianModel::load_from_checkpoint(&ckpt_path).unwrap();

    let weights = export_to_native(&model, TaskType::Segmentation, project.path()).unwrap();
    assert!(weights.is_file());

    let input = root.join("test/bad/000.png");
    let output = project.path().join("output.png");
    let args = infer::native::Args::from_iter(vec![
        "native-infer".to_string(),
        "--weights".to_string(),
        weights.to_str().unwrap().to_string(),
        "--input".to_string(),
        input.to_str().unwrap().to_string(),
        "--output".to_string(),
        output.to_str().unwrap().to_string(),
    ]);
    infer::native::infer(args).unwrap();

    assert!(output.is_file());
    let image = vision::image::load(&output).unwrap();
    assert_eq!(image.size(), &[3, 64, 64]);
}

#[async_std::test]
async fn portable_inference_entrypoint() {
    let project = tempfile::tempdir().unwrap();
    let root = project.path().join("dataset");
    make_dummy_tree(&root);

    let model = fit_dummy_model(root.clone()).await.unwrap();
    let (weights, metadata) =
        export_to_portable(&model, TaskType::Segmentation, project.path()).unwrap();
    assert!(weights.is_file());
    assert!(metadata.is_file());

    let input = root.join("test/bad/000.png");
    let output = project.path().join("output.png");
    let args = infer::portable::Args::from_iter(vec![
        "portable-infer".to_string(),
        "--weights".to_string(),
        weights.to_str().unwrap().to_string(),
        "--metadata".to_string(),
        metadata.to_str().unwrap().to_string(),
        "--input".to_string(),
        input.to_str().unwrap().to_string(),
        "--output".to_string(),
        output.to_str().unwrap().to_string(),
    ]);
    infer::portable::infer(args).unwrap();

    assert!(output.is_file());
}

#[async_std::test]
async fn portable_inference_defaults_metadata_location() {
    let project = tempfile::tempdir().unwrap();
    let root = project.path().join("dataset");
    make_dummy_tree(&root);

    let model = fit_dummy_model(root.clone()).await.unwrap();
    let (weights, _metadata) =
        export_to_portable(&model, TaskType::Classification, project.path()).unwrap();

    let input = root.join("test/bad/001.png");
    let output = project.path().join("out/output.png");
    let args = infer::portable::Args::from_iter(vec![
        "portable-infer".to_string(),
        "--weights".to_string(),
        weights.to_str().unwrap().to_string(),
        "--input".to_string(),
        input.to_str().unwrap().to_string(),
        "--output".to_string(),
        output.to_str().unwrap().to_string(),
    ]);
    infer::portable::infer(args).unwrap();

    assert!(output.is_file());
}
