#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

pub fn write_rgb(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    let image = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 120]));
    DynamicImage::ImageRgb8(image)
        .save_with_format(&path, format)
        .expect("write rgb test image");
    path
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    write_rgb(dir, name, width, height, ImageFormat::Png)
}

pub fn write_transparent_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 0]))
        .save_with_format(&path, ImageFormat::Png)
        .expect("write rgba test image");
    path
}

pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not an image").expect("write garbage file");
    path
}

/// 依檔案順序解碼所有影格：(邊長, RGBA 資料)
pub fn read_frames(path: &Path) -> Vec<(u32, Vec<u8>)> {
    let icon_dir = ico::IconDir::read(File::open(path).expect("open ico")).expect("read ico");
    icon_dir
        .entries()
        .iter()
        .map(|entry| {
            assert_eq!(entry.width(), entry.height());
            let image = entry.decode().expect("decode entry");
            (image.width(), image.rgba_data().to_vec())
        })
        .collect()
}

/// 不透明像素的外框：(x, y, 寬, 高)
pub fn opaque_bounds(size: u32, rgba: &[u8]) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..size {
        for x in 0..size {
            let alpha = rgba[((y * size + x) * 4 + 3) as usize];
            if alpha == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}
