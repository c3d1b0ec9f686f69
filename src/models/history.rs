use std::fmt;
use std::path::PathBuf;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub id: i64,
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    /// 逗號分隔的尺寸，例如 "16,32,48"
    pub sizes: String,
    pub timestamp: NaiveDateTime,
}

impl HistoryRecord {
    pub fn size_list(&self) -> Vec<u32> {
        self.sizes
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect()
    }
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |path: &PathBuf| {
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string())
        };
        let sizes: Vec<String> = self.size_list().iter().map(u32::to_string).collect();
        write!(
            f,
            "{} - {} → {} [{}px]",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            name(&self.source_path),
            name(&self.output_path),
            sizes.join(", ")
        )
    }
}

pub fn join_sizes(sizes: &[u32]) -> String {
    sizes.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
}
