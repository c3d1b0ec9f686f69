use std::io;

// 應用配置結構體，封裝所有轉換參數
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub inputs: Vec<String>,
    pub output: String,
    pub sizes: Vec<u32>,
    pub preserve_aspect_ratio: bool,
    pub force_alpha_channel: bool,
    pub parallel: bool,
    pub include: Vec<String>,
    pub exclude: Option<Vec<String>>,
    pub no_progress: bool,
    /// None 表示不記錄歷史
    pub history_db: Option<String>,
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> io::Result<AppConfig>;
}

// 轉換執行的 Port
pub trait ConversionPort {
    fn execute(&self, config: AppConfig) -> io::Result<String>;
}
