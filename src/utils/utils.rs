use std::io;
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};
use regex::RegexSet;
use tokio::runtime::Runtime;
use crate::models::batch::ProgressEvent;

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    // 互動模式可能重複初始化，忽略已設定的情況
    let _ = env_logger::Builder::new()
        .filter_level(log_level_filter)
        .try_init();
    Ok(())
}

pub fn build_runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
    start: Instant,
}

impl ProgressManager {
    pub fn new(no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40}] {pos}/{len} ETA: {eta_precise}") {
                pb.set_style(style.progress_chars("##-"));
            }
            pb
        };
        ProgressManager {
            pb,
            no_progress,
            start: Instant::now(),
        }
    }

    pub fn handle(&self, event: &ProgressEvent) {
        if self.no_progress {
            return;
        }
        self.pb.set_length(event.total() as u64);
        match event {
            ProgressEvent::Started { index, total, file_name } => {
                self.pb.set_message(format!("正在轉換 {}/{}：{}", index, total, file_name));
            }
            ProgressEvent::Finished { file_name, success, .. } => {
                if !success {
                    self.pb.println(format!("轉換失敗：{}", file_name));
                }
                self.pb.inc(1);
            }
        }
    }

    pub fn finish(&self, success_count: usize, total_count: usize) {
        if self.no_progress {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        self.pb.finish_with_message(format!(
            "完成 {}/{}，耗時 {:.2} 秒",
            success_count, total_count, elapsed
        ));
    }
}

/// 將 `*` 萬用字元模式轉為正則，其餘字元視為字面值
pub fn wildcard_to_regex(pattern: &str) -> String {
    pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*")
}

pub fn create_regex_sets(include: &[String], exclude: &[String]) -> (RegexSet, RegexSet) {
    let include_patterns: Vec<_> = include.iter().map(|p| wildcard_to_regex(p)).collect();
    let exclude_patterns: Vec<_> = exclude.iter().map(|p| wildcard_to_regex(p)).collect();

    let include_set = RegexSet::new(&include_patterns)
        .unwrap_or_else(|e| {
            log::warn!("無效的包含模式: {}，使用空集作為回退", e);
            RegexSet::empty()
        });

    let exclude_set = RegexSet::new(&exclude_patterns)
        .unwrap_or_else(|e| {
            log::warn!("無效的排除模式: {}，使用空集作為回退", e);
            RegexSet::empty()
        });

    (include_set, exclude_set)
}

pub fn format_sizes(sizes: &[u32]) -> String {
    let list: Vec<String> = sizes.iter().map(|s| format!("{}x{}", s, s)).collect();
    list.join(", ")
}
