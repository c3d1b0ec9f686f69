use std::path::PathBuf;
use crate::config::ports::AppConfig;
use crate::models::conversion::ConversionResult;

#[derive(Debug, Clone)]
pub struct BatchInput {
    pub input_paths: Vec<PathBuf>,
    pub output: PathBuf,
    pub sizes: Vec<u32>,
    pub preserve_aspect_ratio: bool,
    pub force_alpha_channel: bool,
    pub include: Vec<String>,
    pub exclude: Option<Vec<String>>,
    pub parallel: bool,
}

impl From<&AppConfig> for BatchInput {
    fn from(config: &AppConfig) -> Self {
        BatchInput {
            input_paths: config.inputs.iter().map(PathBuf::from).collect(),
            output: PathBuf::from(&config.output),
            sizes: config.sizes.clone(),
            preserve_aspect_ratio: config.preserve_aspect_ratio,
            force_alpha_channel: config.force_alpha_channel,
            include: config.include.clone(),
            exclude: config.exclude.clone(),
            parallel: config.parallel,
        }
    }
}

// 批次進度通知，index 從 1 開始
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started { index: usize, total: usize, file_name: String },
    Finished { index: usize, total: usize, file_name: String, success: bool },
}

impl ProgressEvent {
    pub fn total(&self) -> usize {
        match self {
            ProgressEvent::Started { total, .. } | ProgressEvent::Finished { total, .. } => *total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    /// 取消後未開始的檔案為 None
    pub result: Option<ConversionResult>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.success)
    }

    pub fn is_skipped(&self) -> bool {
        self.result.is_none()
    }
}

#[derive(Debug)]
pub struct BatchOutput {
    pub results: Vec<FileOutcome>,
    pub success_count: usize,
    pub total_count: usize,
    pub skipped_count: usize,
    pub output_dir: PathBuf,
    pub is_batch: bool,
}

impl BatchOutput {
    pub fn new(results: Vec<FileOutcome>, output_dir: PathBuf, is_batch: bool) -> Self {
        let success_count = results.iter().filter(|o| o.is_success()).count();
        let skipped_count = results.iter().filter(|o| o.is_skipped()).count();
        BatchOutput {
            total_count: results.len(),
            results,
            success_count,
            skipped_count,
            output_dir,
            is_batch,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.total_count - self.success_count - self.skipped_count
    }
}
