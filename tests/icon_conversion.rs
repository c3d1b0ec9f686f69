mod common;

use std::fs;
use std::io;
use std::path::Path;
use image::ImageFormat;
use image_to_ico::models::conversion::{ConversionError, ConversionRequest, IconFrame};
use image_to_ico::service::icon::{IcoFileWriter, IconService};
use image_to_ico::service::traits::i_service::{IconServiceTrait, IconWriterTrait};
use tempfile::TempDir;

use common::*;

#[test]
fn wide_source_is_padded_and_centered() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "wide.png", 100, 50);
    let output = dir.path().join("wide.ico");

    let result = IconService::new().convert(&ConversionRequest::new(&source, &output, vec![16, 32]));
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.sizes(), vec![16, 32]);

    let frames = read_frames(&output);
    assert_eq!(frames.len(), 2);
    assert_eq!(opaque_bounds(16, &frames[0].1), Some((0, 4, 16, 8)));
    assert_eq!(opaque_bounds(32, &frames[1].1), Some((0, 8, 32, 16)));
}

#[test]
fn tall_source_keeps_ratio_on_every_frame() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "tall.png", 30, 90);
    let output = dir.path().join("tall.ico");

    let result = IconService::new().convert(&ConversionRequest::new(&source, &output, vec![48, 24, 96]));
    assert!(result.success, "{:?}", result.error);

    for (size, rgba) in read_frames(&output) {
        let (x, y, w, h) = opaque_bounds(size, &rgba).unwrap();
        assert_eq!(h, size);
        assert_eq!(w, ((30.0 * size as f64 / 90.0).round()) as u32);
        assert_eq!((x, y), ((size - w) / 2, 0));
    }
}

#[test]
fn squash_mode_fills_whole_canvas() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "wide.png", 100, 50);
    let output = dir.path().join("squash.ico");

    let request = ConversionRequest::new(&source, &output, vec![16, 48]).preserve_aspect_ratio(false);
    assert!(IconService::new().convert(&request).success);

    for (size, rgba) in read_frames(&output) {
        assert_eq!(opaque_bounds(size, &rgba), Some((0, 0, size, size)));
        assert!(rgba.chunks(4).all(|px| px[3] == 255));
    }
}

#[test]
fn frames_are_ascending_and_duplicates_collapse() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "logo.png", 64, 64);
    let output = dir.path().join("logo.ico");

    let result = IconService::new().convert(&ConversionRequest::new(&source, &output, vec![256, 16, 32, 16, 48]));
    assert!(result.success);

    let sizes: Vec<u32> = read_frames(&output).iter().map(|(size, _)| *size).collect();
    assert_eq!(sizes, vec![16, 32, 48, 256]);
}

#[test]
fn duplicate_only_request_produces_single_frame() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "logo.png", 20, 20);
    let output = dir.path().join("logo.ico");

    let result = IconService::new().convert(&ConversionRequest::new(&source, &output, vec![16, 16, 32]));
    assert_eq!(result.sizes(), vec![16, 32]);
    assert_eq!(read_frames(&output).len(), 2);

    let single = dir.path().join("single.ico");
    let result = IconService::new().convert(&ConversionRequest::new(&source, &single, vec![48]));
    assert!(result.success);
    assert_eq!(read_frames(&single).len(), 1);
}

#[test]
fn jpeg_source_gets_opaque_alpha_channel() {
    let dir = TempDir::new().unwrap();
    let source = write_rgb(dir.path(), "photo.jpg", 64, 64, ImageFormat::Jpeg);
    let output = dir.path().join("photo.ico");

    let result = IconService::new().convert(&ConversionRequest::new(&source, &output, vec![48]));
    assert!(result.success, "{:?}", result.error);

    let frames = read_frames(&output);
    assert_eq!(frames.len(), 1);
    let (size, rgba) = &frames[0];
    assert_eq!(*size, 48);
    assert_eq!(rgba.len(), 48 * 48 * 4);
    assert!(rgba.chunks(4).all(|px| px[3] == 255));
}

#[test]
fn transparent_source_stays_transparent() {
    let dir = TempDir::new().unwrap();
    let source = write_transparent_png(dir.path(), "clear.png", 40, 20);
    let output = dir.path().join("clear.ico");

    let result = IconService::new().convert(&ConversionRequest::new(&source, &output, vec![32]));
    assert!(result.success);
    let (_, rgba) = &read_frames(&output)[0];
    assert!(rgba.chunks(4).all(|px| px[3] == 0));
}

#[test]
fn repeated_conversion_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "logo.png", 100, 50);
    let first = dir.path().join("first.ico");
    let second = dir.path().join("second.ico");

    let service = IconService::new();
    assert!(service.convert(&ConversionRequest::new(&source, &first, vec![16, 32, 48])).success);
    assert!(service.convert(&ConversionRequest::new(&source, &second, vec![48, 32, 16])).success);
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn missing_output_directory_is_created() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "logo.png", 32, 32);
    let output = dir.path().join("nested").join("icons").join("logo.ico");

    assert!(IconService::new().convert(&ConversionRequest::new(&source, &output, vec![16])).success);
    assert!(output.exists());
}

#[test]
fn undecodable_source_reports_decode_error() {
    let dir = TempDir::new().unwrap();
    let source = write_garbage(dir.path(), "broken.png");
    let output = dir.path().join("broken.ico");

    let result = IconService::new().convert(&ConversionRequest::new(&source, &output, vec![16]));
    assert!(!result.success);
    assert!(matches!(result.error, Some(ConversionError::Decode { .. })));
    assert!(!output.exists());
}

#[test]
fn invalid_sizes_are_rejected_before_writing() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "logo.png", 32, 32);
    let output = dir.path().join("logo.ico");

    for sizes in [vec![], vec![0, 16], vec![16, 512]] {
        let result = IconService::new().convert(&ConversionRequest::new(&source, &output, sizes));
        assert!(matches!(result.error, Some(ConversionError::InvalidSize(_))));
        assert!(!output.exists());
    }
}

/// 只寫出第一個影格，模擬容器遺失尺寸
struct DroppingWriter;

impl IconWriterTrait for DroppingWriter {
    fn write_icon(&self, frames: &[IconFrame], output_path: &Path) -> io::Result<()> {
        IcoFileWriter.write_icon(&frames[..1], output_path)
    }
}

struct CorruptWriter;

impl IconWriterTrait for CorruptWriter {
    fn write_icon(&self, _frames: &[IconFrame], output_path: &Path) -> io::Result<()> {
        fs::write(output_path, b"\x89PNG garbage")
    }
}

struct FailingWriter;

impl IconWriterTrait for FailingWriter {
    fn write_icon(&self, _frames: &[IconFrame], output_path: &Path) -> io::Result<()> {
        fs::write(output_path, b"\0\0\x01\0")?;
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }
}

#[test]
fn verification_mismatch_removes_output() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "logo.png", 64, 64);
    let output = dir.path().join("logo.ico");

    let service = IconService::with_writer(Box::new(DroppingWriter));
    let result = service.convert(&ConversionRequest::new(&source, &output, vec![16, 32]));
    assert!(!result.success);
    match result.error {
        Some(ConversionError::VerificationMismatch { expected, actual }) => {
            assert_eq!(expected, vec![16, 32]);
            assert_eq!(actual, vec![16]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn corrupt_container_removes_output() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "logo.png", 64, 64);
    let output = dir.path().join("logo.ico");

    let result = IconService::with_writer(Box::new(CorruptWriter))
        .convert(&ConversionRequest::new(&source, &output, vec![16]));
    assert!(matches!(result.error, Some(ConversionError::NotIcoContainer(_))));
    assert!(!output.exists());
}

#[test]
fn write_failure_removes_partial_output() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "logo.png", 64, 64);
    let output = dir.path().join("logo.ico");

    let result = IconService::with_writer(Box::new(FailingWriter))
        .convert(&ConversionRequest::new(&source, &output, vec![16]));
    assert!(matches!(result.error, Some(ConversionError::Write { .. })));
    assert!(!output.exists());
}
