mod common;

use anomaly_dl::{
    config::ImageSize,
    dataset::{
        DatasetLifecycle, GenericDataset, PredictDataset, RandomAccessDataset,
        RandomAccessStream, StreamingDataset,
    },
    error::Error,
    transform::Resize,
};
use futures::stream::TryStreamExt;
use std::sync::Arc;

#[async_std::test]
async fn predict_dataset_over_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("mvtec").join("dummy");
    common::make_mvtec_dummy(&root);

    let mut dataset =
        PredictDataset::new(root.join("test/bad"), ImageSize::square(256).unwrap()).unwrap();
    dataset.prepare_data().unwrap();
    dataset.setup().unwrap();

    // the dummy tree has 5 abnormal test images
    assert_eq!(dataset.num_records(), 5);

    let sample = dataset.nth(0).await.unwrap();
    assert_eq!(sample.image.size(), &[3, 256, 256]);
    assert_eq!(
        sample.image_path.extension().unwrap().to_str().unwrap(),
        "png"
    );
    assert!(sample.label.is_none());
    assert!(sample.mask.is_none());
}

#[async_std::test]
async fn predict_dataset_applies_explicit_transform() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("mvtec").join("dummy");
    common::make_mvtec_dummy(&root);

    let transform = Arc::new(Resize::channels_last(ImageSize::square(512).unwrap()));
    let mut dataset = PredictDataset::new(root.join("test/bad"), ImageSize::square(256).unwrap())
        .unwrap()
        .with_transform(transform);
    dataset.prepare_data().unwrap();
    dataset.setup().unwrap();

    let sample = dataset.nth(0).await.unwrap();
    assert_eq!(sample.image.size(), &[512, 512, 3]);
}

#[async_std::test]
async fn predict_dataset_over_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("mvtec").join("dummy");
    common::make_mvtec_dummy(&root);

    let mut dataset = PredictDataset::new(
        root.join("test/bad/000.png"),
        ImageSize::square(256).unwrap(),
    )
    .unwrap();
    dataset.prepare_data().unwrap();
    dataset.setup().unwrap();

    assert_eq!(dataset.num_records(), 1);
    let sample = dataset.nth(0).await.unwrap();
    assert_eq!(sample.image.size(), &[3, 256, 256]);
}

#[async_std::test]
async fn streaming_enumerates_every_sample() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("mvtec").join("dummy");
    common::make_mvtec_dummy(&root);

    let mut dataset =
        PredictDataset::new(root.join("test/bad"), ImageSize::square(256).unwrap()).unwrap();
    dataset.prepare_data().unwrap();
    dataset.setup().unwrap();

    let stream = RandomAccessStream::new(dataset);
    let samples: Vec<_> = stream.stream().unwrap().try_collect().await.unwrap();

    assert_eq!(samples.len(), 5);
    for sample in samples {
        assert_eq!(sample.image.size(), &[3, 256, 256]);
    }
}

#[test]
fn streaming_before_setup_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("mvtec").join("dummy");
    common::make_mvtec_dummy(&root);

    let dataset =
        PredictDataset::new(root.join("test/bad"), ImageSize::square(256).unwrap()).unwrap();
    let stream = RandomAccessStream::new(dataset);

    let err = stream
        .stream()
        .err()
        .expect("stream() should fail before setup");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotSetUp)));
}
