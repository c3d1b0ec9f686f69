use std::fmt;
use std::path::PathBuf;

#[derive(Clone)]
pub struct FileCollectInput {
    pub input_paths: Vec<PathBuf>,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct FileCollectOutput {
    pub files: Vec<PathBuf>,
    pub skipped: usize,
}

// 來源圖片與其輸出 ICO 路徑
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTarget {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub color_mode: String,
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "檔案名稱: {}", self.file_name)?;
        writeln!(f, "尺寸: {}x{}", self.width, self.height)?;
        writeln!(f, "格式: {}", self.format)?;
        write!(f, "模式: {}", self.color_mode)
    }
}
