use std::io;
use std::path::{Path, PathBuf};
use image::ImageReader;
use log::{info, warn};
use regex::RegexSet;
use walkdir::WalkDir;
use crate::config::config::validate_input_path;
use crate::models::file::{ConversionTarget, FileCollectInput, FileCollectOutput, ImageInfo};
use crate::service::traits::i_service::FileServiceTrait;
use crate::utils::utils::create_regex_sets;

/// 掃描目錄時視為圖片的副檔名
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

pub const ICON_EXTENSION: &str = "ico";

/// File 服務，負責收集來源圖片並實現 FileServiceTrait
pub struct FileService;

impl FileService {
    pub fn new() -> Self {
        FileService
    }
}

impl Default for FileService {
    fn default() -> Self {
        Self::new()
    }
}

impl FileServiceTrait for FileService {
    fn collect_images(&self, input: FileCollectInput) -> io::Result<FileCollectOutput> {
        let exclude = input.exclude_patterns.clone().unwrap_or_default();
        let (include_set, exclude_set) = create_regex_sets(&input.include_patterns, &exclude);

        let mut files = Vec::new();
        let mut skipped = 0;
        for path in &input.input_paths {
            validate_input_path(&path.to_string_lossy())?;
            if path.is_file() {
                // 直接指定的檔案不檢查副檔名，交給解碼器判斷
                if is_path_selected(path, &include_set, &exclude_set) {
                    files.push(path.clone());
                } else {
                    skipped += 1;
                }
            } else {
                skipped += collect_from_dir(path, &mut files, &include_set, &exclude_set);
            }
        }

        info!("共找到 {} 個圖片檔案，略過 {} 個", files.len(), skipped);
        Ok(FileCollectOutput { files, skipped })
    }

    fn inspect_image(&self, path: &Path) -> io::Result<ImageInfo> {
        validate_input_path(&path.to_string_lossy())?;
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader
            .format()
            .map(|f| format!("{:?}", f).to_uppercase())
            .unwrap_or_else(|| "未知".to_string());
        let image = reader
            .decode()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("無法載入圖片: {}", e)))?;

        Ok(ImageInfo {
            file_name: display_name(path),
            width: image.width(),
            height: image.height(),
            format,
            color_mode: format!("{:?}", image.color()),
        })
    }
}

fn collect_from_dir(dir: &Path, files: &mut Vec<PathBuf>, include_set: &RegexSet, exclude_set: &RegexSet) -> usize {
    let mut skipped = 0;
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("無法讀取目錄項目：{}，跳過", e);
                skipped += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if has_image_extension(path) && is_path_selected(path, include_set, exclude_set) {
            files.push(path.to_path_buf());
        } else {
            skipped += 1;
        }
    }
    skipped
}

pub fn has_image_extension(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn has_icon_extension(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| ext == ICON_EXTENSION)
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().to_lowercase())
}

fn is_path_selected(path: &Path, include_set: &RegexSet, exclude_set: &RegexSet) -> bool {
    let path_str = path.to_string_lossy();
    (include_set.is_empty() || include_set.is_match(&path_str)) && !exclude_set.is_match(&path_str)
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// `<stem>.ico`
pub fn icon_file_name(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "icon".to_string());
    PathBuf::from(format!("{}.{}", stem, ICON_EXTENSION))
}

/// 多個檔案、輸出為現有目錄或不是 .ico 路徑時為批次模式
pub fn is_batch_output(file_count: usize, output: &Path) -> bool {
    file_count > 1 || output.is_dir() || !has_icon_extension(output)
}

/// 批次模式下輸出檔案所在的目錄
pub fn batch_output_dir(files: &[PathBuf], output: &Path) -> PathBuf {
    if output.is_dir() || !has_icon_extension(output) {
        return output.to_path_buf();
    }
    output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| files.first().and_then(|f| f.parent()))
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 決定每個來源圖片的輸出路徑
pub fn resolve_targets(files: &[PathBuf], output: &Path) -> Vec<ConversionTarget> {
    if !is_batch_output(files.len(), output) {
        return files
            .iter()
            .map(|source| ConversionTarget {
                source_path: source.clone(),
                output_path: output.to_path_buf(),
            })
            .collect();
    }

    let output_dir = batch_output_dir(files, output);
    let targets: Vec<ConversionTarget> = files
        .iter()
        .map(|source| ConversionTarget {
            source_path: source.clone(),
            output_path: output_dir.join(icon_file_name(source)),
        })
        .collect();

    for (i, target) in targets.iter().enumerate() {
        if targets[..i].iter().any(|t| t.output_path == target.output_path) {
            warn!("多個來源對應同一輸出檔案，後者將覆蓋前者：{}", target.output_path.display());
        }
    }
    targets
}
