use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use image::RgbaImage;
use thiserror::Error;

/// ICO 目錄項目能宣告的最大邊長
pub const MAX_ICON_SIZE: u32 = 256;

// 單一檔案的轉換失敗原因，逐檔回報，不會中斷批次
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("無法解碼來源圖片 {path}：{message}")]
    Decode { path: PathBuf, message: String },
    #[error("無效的圖示尺寸：{0}")]
    InvalidSize(String),
    #[error("縮放失敗：{0}")]
    Resample(String),
    #[error("寫入 ICO 檔案失敗 {path}：{message}")]
    Write { path: PathBuf, message: String },
    #[error("生成的不是有效的 ICO 檔案：{0}")]
    NotIcoContainer(String),
    #[error("ICO 檔案尺寸不匹配，期望：{expected:?}，實際：{actual:?}")]
    VerificationMismatch { expected: Vec<u32>, actual: Vec<u32> },
}

impl ConversionError {
    pub fn decode(path: &Path, err: impl std::fmt::Display) -> Self {
        ConversionError::Decode { path: path.to_path_buf(), message: err.to_string() }
    }

    pub fn write(path: &Path, err: impl std::fmt::Display) -> Self {
        ConversionError::Write { path: path.to_path_buf(), message: err.to_string() }
    }
}

#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub target_sizes: Vec<u32>,
    pub preserve_aspect_ratio: bool,
    pub force_alpha_channel: bool,
}

impl ConversionRequest {
    pub fn new(source_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>, target_sizes: Vec<u32>) -> Self {
        ConversionRequest {
            source_path: source_path.into(),
            output_path: output_path.into(),
            target_sizes,
            preserve_aspect_ratio: true,
            force_alpha_channel: false,
        }
    }

    pub fn preserve_aspect_ratio(mut self, preserve: bool) -> Self {
        self.preserve_aspect_ratio = preserve;
        self
    }

    pub fn force_alpha_channel(mut self, force: bool) -> Self {
        self.force_alpha_channel = force;
        self
    }

    /// 去除重複並由小到大排序的尺寸清單，處理前先驗證每個尺寸
    pub fn normalized_sizes(&self) -> Result<Vec<u32>, ConversionError> {
        if self.target_sizes.is_empty() {
            return Err(ConversionError::InvalidSize("至少需要一個圖示尺寸".to_string()));
        }
        if let Some(&size) = self.target_sizes.iter().find(|&&s| s == 0 || s > MAX_ICON_SIZE) {
            return Err(ConversionError::InvalidSize(format!(
                "{}（允許範圍 1-{}）",
                size, MAX_ICON_SIZE
            )));
        }
        let distinct: BTreeSet<u32> = self.target_sizes.iter().copied().collect();
        Ok(distinct.into_iter().collect())
    }
}

/// 單一尺寸的正方形 RGBA 影格
#[derive(Debug, Clone)]
pub struct IconFrame {
    pub size: u32,
    pub image: RgbaImage,
}

#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub success: bool,
    pub output_path: PathBuf,
    pub produced_sizes: BTreeSet<u32>,
    pub error: Option<ConversionError>,
}

impl ConversionResult {
    pub fn succeeded(output_path: &Path, produced_sizes: BTreeSet<u32>) -> Self {
        ConversionResult {
            success: true,
            output_path: output_path.to_path_buf(),
            produced_sizes,
            error: None,
        }
    }

    pub fn failed(output_path: &Path, error: ConversionError) -> Self {
        ConversionResult {
            success: false,
            output_path: output_path.to_path_buf(),
            produced_sizes: BTreeSet::new(),
            error: Some(error),
        }
    }

    pub fn sizes(&self) -> Vec<u32> {
        self.produced_sizes.iter().copied().collect()
    }
}
