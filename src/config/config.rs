use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::Path;
use crate::models::conversion::MAX_ICON_SIZE;
use crate::service::history::DEFAULT_HISTORY_DB;

/// 未指定時使用的圖示尺寸
pub const DEFAULT_SIZES: [u32; 4] = [16, 32, 48, 256];

/// 互動模式中可選的標準 ICO 尺寸
pub const STANDARD_SIZES: [u32; 7] = [16, 24, 32, 48, 64, 128, 256];

#[derive(Parser, Clone)]
#[command(
    name = "image_to_ico",
    version,
    about = "將圖片轉換為多尺寸 ICO 圖示",
    long_about = "一個將圖片（PNG、JPEG、BMP、GIF 等）轉換為多尺寸 ICO 圖示的工具，支援單檔與批次轉換、保持寬高比置中填充、強制透明通道，並記錄轉換歷史。\n不帶任何參數執行時進入互動模式。\n使用 `--help` 查看詳細用法。",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[arg(long, global = true, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,
    #[arg(long, global = true, default_value = DEFAULT_HISTORY_DB)]
    pub db: String,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// 轉換圖片為 ICO 檔案
    Convert(ConvertArgs),
    /// 顯示最近的轉換歷史
    History {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// 清除所有轉換歷史
    ClearHistory {
        /// 不詢問直接清除
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
    /// 顯示圖片資訊
    Info {
        path: String,
    },
}

#[derive(Args, Clone, Debug)]
pub struct ConvertArgs {
    /// 圖片檔案或目錄，可指定多個
    #[arg(required = true)]
    pub inputs: Vec<String>,
    /// 輸出 .ico 檔案（單檔）或輸出目錄（批次）
    #[arg(short, long, default_value = "output")]
    pub output: String,
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SIZES)]
    pub sizes: Vec<u32>,
    /// 直接縮放為正方形，不保持寬高比
    #[arg(long, default_value_t = false)]
    pub no_preserve_aspect: bool,
    #[arg(long, default_value_t = false)]
    pub force_alpha: bool,
    #[arg(long, default_value_t = false)]
    pub parallel: bool,
    #[arg(long, default_value = "*", value_delimiter = ',')]
    pub include: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value_t = false)]
    pub no_history: bool,
}

pub fn validate_input_path(input: &str) -> io::Result<&Path> {
    let path = Path::new(input);
    if !path.exists() {
        log::error!("輸入路徑不存在：{}", input);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入路徑 '{}' 不存在", input)
        ));
    }
    Ok(path)
}

pub fn validate_sizes(sizes: &[u32]) -> io::Result<()> {
    if sizes.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "請至少選擇一個圖標尺寸"));
    }
    if let Some(size) = sizes.iter().find(|&&s| s == 0 || s > MAX_ICON_SIZE) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("無效的圖示尺寸: {}（允許範圍 1-{}）", size, MAX_ICON_SIZE)
        ));
    }
    Ok(())
}

pub fn is_valid_pattern(pattern: &str) -> bool {
    let invalid_chars = ['/', '\\', ':', '?', '"', '<', '>', '|'];
    !pattern.is_empty() && !pattern.contains(&invalid_chars[..])
}

pub fn validate_file_patterns(include: &[String], exclude: &Option<Vec<String>>) -> io::Result<()> {
    for pattern in include {
        if !is_valid_pattern(pattern) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("無效的包含模式: {}", pattern)));
        }
    }
    if let Some(exclude_patterns) = exclude {
        for pattern in exclude_patterns {
            if !is_valid_pattern(pattern) {
                return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("無效的排除模式: {}", pattern)));
            }
        }
    }
    Ok(())
}
