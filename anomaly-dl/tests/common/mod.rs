#![allow(dead_code)]

use std::{fs, path::Path};
use tch::{kind::FLOAT_CPU, vision, Kind, Tensor};

pub fn write_image(path: &Path, height: i64, width: i64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let image = (Tensor::rand(&[3, height, width], FLOAT_CPU) * 255.0).to_kind(Kind::Uint8);
    vision::image::save(&image, path).unwrap();
}

pub fn write_blank_mask(path: &Path, height: i64, width: i64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mask = Tensor::zeros(&[3, height, width], FLOAT_CPU).to_kind(Kind::Uint8);
    vision::image::save(&mask, path).unwrap();
}

pub fn write_defect_mask(path: &Path, height: i64, width: i64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mask = Tensor::zeros(&[3, height, width], FLOAT_CPU);
    let _ = mask
        .narrow(1, height / 4, height / 2)
        .narrow(2, width / 4, width / 2)
        .fill_(255.0);
    vision::image::save(&mask.to_kind(Kind::Uint8), path).unwrap();
}

/// A dummy MVTec AD style category: 5 normal training images, 3 normal
/// test images, and 5 abnormal test images with paired masks.
pub fn make_mvtec_dummy(root: &Path) {
    for index in 0..5 {
        write_image(&root.join(format!("train/good/{:03}.png", index)), 64, 64);
    }
    for index in 0..3 {
        write_image(&root.join(format!("test/good/{:03}.png", index)), 64, 64);
    }
    for index in 0..5 {
        write_image(&root.join(format!("test/bad/{:03}.png", index)), 64, 64);
        write_defect_mask(
            &root.join(format!("ground_truth/bad/{:03}_mask.png", index)),
            64,
            64,
        );
    }
}

/// A dummy Kolektor tree: five part images across three item folders,
/// two of them with a non-empty ground-truth mask.
pub fn make_kolektor_dummy(root: &Path) {
    write_image(&root.join("kos01/Part0.jpg"), 64, 64);
    write_defect_mask(&root.join("kos01/Part0_GT.bmp"), 64, 64);
    write_image(&root.join("kos01/Part1.jpg"), 64, 64);
    write_blank_mask(&root.join("kos01/Part1_GT.bmp"), 64, 64);

    write_image(&root.join("kos02/Part0.jpg"), 64, 64);
    write_blank_mask(&root.join("kos02/Part0_GT.bmp"), 64, 64);
    write_image(&root.join("kos02/Part1.jpg"), 64, 64);
    write_defect_mask(&root.join("kos02/Part1_GT.bmp"), 64, 64);

    write_image(&root.join("kos03/Part0.jpg"), 64, 64);
    write_blank_mask(&root.join("kos03/Part0_GT.bmp"), 64, 64);
}

/// A dummy MVTec 3D-AD category with rgb, gt and xyz folders.
pub fn make_mvtec3d_dummy(root: &Path, category: &str) {
    let category_dir = root.join(category);

    for index in 0..4 {
        write_image(
            &category_dir.join(format!("train/good/rgb/{:03}.png", index)),
            64,
            64,
        );
        write_image(
            &category_dir.join(format!("train/good/xyz/{:03}.png", index)),
            64,
            64,
        );
    }
    for index in 0..2 {
        write_image(
            &category_dir.join(format!("test/good/rgb/{:03}.png", index)),
            64,
            64,
        );
        write_image(
            &category_dir.join(format!("test/good/xyz/{:03}.png", index)),
            64,
            64,
        );
    }
    for index in 0..5 {
        write_image(
            &category_dir.join(format!("test/bad/rgb/{:03}.png", index)),
            64,
            64,
        );
        write_defect_mask(
            &category_dir.join(format!("test/bad/gt/{:03}.png", index)),
            64,
            64,
        );
        write_image(
            &category_dir.join(format!("test/bad/xyz/{:03}.png", index)),
            64,
            64,
        );
    }
    write_image(&category_dir.join("validation/bad/rgb/000.png"), 64, 64);
    write_defect_mask(&category_dir.join("validation/bad/gt/000.png"), 64, 64);
    write_image(&category_dir.join("validation/bad/xyz/000.png"), 64, 64);
}

/// A dummy VisA category in the converted one-class layout.
pub fn make_visa_dummy(root: &Path, category: &str) {
    let category_dir = root.join("visa_pytorch").join(category);

    for index in 0..4 {
        write_image(
            &category_dir.join(format!("train/good/{:03}.jpg", index)),
            64,
            64,
        );
    }
    for index in 0..2 {
        write_image(
            &category_dir.join(format!("test/good/{:03}.jpg", index)),
            64,
            64,
        );
    }
    for index in 0..5 {
        write_image(
            &category_dir.join(format!("test/bad/{:03}.jpg", index)),
            64,
            64,
        );
        write_defect_mask(
            &category_dir.join(format!("ground_truth/bad/{:03}.png", index)),
            64,
            64,
        );
    }
}
