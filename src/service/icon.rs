use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Cursor, Write};
use std::path::Path;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use log::{debug, error, info, warn};
use crate::models::conversion::{ConversionError, ConversionRequest, ConversionResult, IconFrame};
use crate::service::traits::i_service::{IconServiceTrait, IconWriterTrait};

const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Icon 服務，負責解碼、縮放、寫出並驗證 ICO 檔案，實現 IconServiceTrait
pub struct IconService {
    writer: Box<dyn IconWriterTrait>,
}

impl IconService {
    /// 使用預設的 ICO 寫出器
    pub fn new() -> Self {
        Self::with_writer(Box::new(IcoFileWriter))
    }

    pub fn with_writer(writer: Box<dyn IconWriterTrait>) -> Self {
        IconService { writer }
    }

    fn try_convert(&self, request: &ConversionRequest) -> Result<BTreeSet<u32>, ConversionError> {
        let sizes = request.normalized_sizes()?;
        let source = load_source(&request.source_path, request.force_alpha_channel)?;
        debug!(
            "來源圖片 {}：{}x{}，模式 {:?}",
            request.source_path.display(),
            source.width(),
            source.height(),
            source.color()
        );

        let mut frames = sizes
            .iter()
            .map(|&size| build_frame(&source, size, request.preserve_aspect_ratio))
            .collect::<Result<Vec<_>, _>>()?;
        // ICO 慣例最小的影格在前
        frames.sort_by_key(|frame| frame.size);

        let output_path = &request.output_path;
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConversionError::write(output_path, e))?;
        }

        if let Err(e) = self.writer.write_icon(&frames, output_path) {
            remove_output(output_path);
            return Err(ConversionError::write(output_path, e));
        }

        verify_icon(output_path, &sizes).inspect_err(|_| remove_output(output_path))
    }
}

impl Default for IconService {
    fn default() -> Self {
        Self::new()
    }
}

impl IconServiceTrait for IconService {
    fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        match self.try_convert(request) {
            Ok(produced) => {
                info!(
                    "轉換完成：{} → {}，尺寸：{:?}",
                    request.source_path.display(),
                    request.output_path.display(),
                    produced
                );
                ConversionResult::succeeded(&request.output_path, produced)
            }
            Err(e) => {
                error!("轉換錯誤 {}：{}", request.source_path.display(), e);
                ConversionResult::failed(&request.output_path, e)
            }
        }
    }
}

/// 以 ico crate 寫出 ICO，每個影格存為 32 位元 PNG 項目
pub struct IcoFileWriter;

impl IconWriterTrait for IcoFileWriter {
    fn write_icon(&self, frames: &[IconFrame], output_path: &Path) -> io::Result<()> {
        let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);
        for frame in frames {
            let image = ico::IconImage::from_rgba_data(frame.size, frame.size, frame.image.as_raw().clone());
            icon_dir.add_entry(ico::IconDirEntry::encode_as_png(&image)?);
        }

        let mut writer = BufWriter::new(File::create(output_path)?);
        icon_dir.write(&mut writer)?;
        writer.flush()
    }
}

/// 解碼來源圖片並依原始格式決定是否加入透明通道
pub fn load_source(path: &Path, force_alpha: bool) -> Result<DynamicImage, ConversionError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| ConversionError::decode(path, e))?;
    let format = reader.format();
    let decoded = reader.decode().map_err(|e| ConversionError::decode(path, e))?;
    Ok(normalize_channels(decoded, format, force_alpha))
}

/// 已有透明通道的圖片保留 RGBA；否則在強制或格式本身不支援透明（JPEG）時轉為 RGBA，其餘轉為 RGB
pub fn normalize_channels(image: DynamicImage, format: Option<ImageFormat>, force_alpha: bool) -> DynamicImage {
    if image.color().has_alpha() {
        return DynamicImage::ImageRgba8(image.to_rgba8());
    }
    if force_alpha || lacks_native_transparency(format) {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}

fn lacks_native_transparency(format: Option<ImageFormat>) -> bool {
    matches!(format, Some(ImageFormat::Jpeg))
}

/// 產生單一尺寸的影格，保持比例時置中於透明畫布
pub fn build_frame(source: &DynamicImage, size: u32, preserve_aspect: bool) -> Result<IconFrame, ConversionError> {
    if size == 0 {
        return Err(ConversionError::InvalidSize("0".to_string()));
    }
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(ConversionError::Resample(format!("來源圖片尺寸為 {}x{}", width, height)));
    }

    let image = if preserve_aspect {
        let (new_width, new_height) = fitted_dimensions(width, height, size);
        let resized = source.resize_exact(new_width, new_height, RESAMPLE_FILTER).to_rgba8();
        let mut canvas = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
        let (x, y) = center_offset(size, new_width, new_height);
        imageops::replace(&mut canvas, &resized, i64::from(x), i64::from(y));
        canvas
    } else {
        source.resize_exact(size, size, RESAMPLE_FILTER).to_rgba8()
    };
    debug!("產生 {}x{} 影格（保持比例：{}）", size, size, preserve_aspect);

    Ok(IconFrame { size, image })
}

/// 等比縮放後能放進 size×size 的最大尺寸
pub fn fitted_dimensions(width: u32, height: u32, size: u32) -> (u32, u32) {
    let ratio = f64::min(size as f64 / width as f64, size as f64 / height as f64);
    let scale = |edge: u32| ((edge as f64 * ratio).round() as u32).clamp(1, size);
    (scale(width), scale(height))
}

pub fn center_offset(size: u32, width: u32, height: u32) -> (u32, u32) {
    ((size - width) / 2, (size - height) / 2)
}

/// 重新開啟 ICO 檔並確認格式、影格順序與尺寸集合，返回實際包含的尺寸
pub fn verify_icon(path: &Path, expected: &[u32]) -> Result<BTreeSet<u32>, ConversionError> {
    let bytes = fs::read(path).map_err(|e| ConversionError::NotIcoContainer(e.to_string()))?;
    match image::guess_format(&bytes) {
        Ok(ImageFormat::Ico) => {}
        Ok(other) => return Err(ConversionError::NotIcoContainer(format!("{:?}", other))),
        Err(e) => return Err(ConversionError::NotIcoContainer(e.to_string())),
    }

    let icon_dir = ico::IconDir::read(Cursor::new(&bytes))
        .map_err(|e| ConversionError::NotIcoContainer(e.to_string()))?;
    if icon_dir.resource_type() != ico::ResourceType::Icon {
        return Err(ConversionError::NotIcoContainer("資源類型為游標".to_string()));
    }

    let widths: Vec<u32> = icon_dir.entries().iter().map(|entry| entry.width()).collect();
    let square = icon_dir.entries().iter().all(|entry| entry.width() == entry.height());
    let ascending = widths.windows(2).all(|pair| pair[0] < pair[1]);
    let actual: BTreeSet<u32> = widths.iter().copied().collect();
    let wanted: BTreeSet<u32> = expected.iter().copied().collect();

    if !square || !ascending || actual != wanted {
        return Err(ConversionError::VerificationMismatch {
            expected: wanted.into_iter().collect(),
            actual: widths,
        });
    }
    Ok(actual)
}

fn remove_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => warn!("已刪除無效的輸出檔案：{}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => error!("無法刪除無效的輸出檔案 {}：{}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn opaque_source(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 40])))
    }

    #[test]
    fn fitted_dimensions_keep_ratio() {
        assert_eq!(fitted_dimensions(100, 50, 32), (32, 16));
        assert_eq!(fitted_dimensions(100, 50, 16), (16, 8));
        assert_eq!(fitted_dimensions(50, 100, 48), (24, 48));
        assert_eq!(fitted_dimensions(10, 10, 256), (256, 256));
        assert_eq!(fitted_dimensions(1000, 1, 16), (16, 1));
    }

    #[test]
    fn center_offset_uses_floor_division() {
        assert_eq!(center_offset(32, 32, 16), (0, 8));
        assert_eq!(center_offset(16, 16, 7), (0, 4));
    }

    #[test]
    fn padded_frame_is_centered_and_transparent_outside() {
        let frame = build_frame(&opaque_source(100, 50), 32, true).unwrap();
        assert_eq!(frame.image.dimensions(), (32, 32));
        for y in 0..32 {
            let inside = (8..24).contains(&y);
            for x in 0..32 {
                let alpha = frame.image.get_pixel(x, y)[3];
                assert_eq!(alpha, if inside { 255 } else { 0 }, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn squashed_frame_fills_canvas() {
        let frame = build_frame(&opaque_source(100, 50), 48, false).unwrap();
        assert_eq!(frame.image.dimensions(), (48, 48));
        assert!(frame.image.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn upscaling_small_source_is_allowed() {
        let frame = build_frame(&opaque_source(4, 4), 64, true).unwrap();
        assert_eq!(frame.image.dimensions(), (64, 64));
        assert!(frame.image.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn normalize_channels_follows_format_rules() {
        let rgb = opaque_source(2, 2);
        assert!(!normalize_channels(rgb.clone(), Some(ImageFormat::Png), false).color().has_alpha());
        assert!(normalize_channels(rgb.clone(), Some(ImageFormat::Png), true).color().has_alpha());
        assert!(normalize_channels(rgb, Some(ImageFormat::Jpeg), false).color().has_alpha());

        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4])));
        let kept = normalize_channels(rgba, Some(ImageFormat::Png), false);
        assert_eq!(kept.to_rgba8().get_pixel(0, 0)[3], 4);
    }

    #[test]
    fn verify_rejects_non_ico_file_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.ico");
        opaque_source(8, 8).save_with_format(&path, ImageFormat::Png).unwrap();
        assert!(matches!(
            verify_icon(&path, &[8]),
            Err(ConversionError::NotIcoContainer(_))
        ));
    }

    #[test]
    fn verify_reports_missing_sizes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.ico");
        let frame = build_frame(&opaque_source(8, 8), 16, true).unwrap();
        IcoFileWriter.write_icon(&[frame], &path).unwrap();

        match verify_icon(&path, &[16, 32]) {
            Err(ConversionError::VerificationMismatch { expected, actual }) => {
                assert_eq!(expected, vec![16, 32]);
                assert_eq!(actual, vec![16]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
