use dialoguer::{Confirm, Input, MultiSelect};
use std::io;
use std::path::Path;

use crate::config::config::{validate_sizes, DEFAULT_SIZES, STANDARD_SIZES};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::service::history::DEFAULT_HISTORY_DB;
use crate::utils::convert::ConversionAdapter;
use crate::utils::utils::setup_logging;

pub fn process_interactive_mode() -> io::Result<String> {
    setup_logging("info")?;
    println!("=== 歡迎使用互動模式 ===");
    let use_default_config = get_default_config_option()?;
    let inputs = get_input_paths()?;
    let output = get_output_path(&inputs)?;

    let config_port: Box<dyn ConfigPort> = if use_default_config {
        println!("使用預設配置：尺寸 {:?}，保持寬高比，記錄歷史", DEFAULT_SIZES);
        Box::new(DefaultConfigAdapter::new(inputs, output))
    } else {
        Box::new(InteractiveConfigAdapter::new(inputs, output))
    };

    let config = ConfigService::new(config_port).get_config()?;
    ConversionAdapter.execute(config)
}

pub fn get_default_config_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否使用預設配置？（常用尺寸、保持寬高比，僅需指定輸入和輸出路徑）")
        .default(true)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("預設配置選擇失敗: {}", e)))
}

pub fn get_input_paths() -> io::Result<Vec<String>> {
    let raw: String = Input::new()
        .with_prompt("請輸入圖片檔案或資料夾路徑，多個以逗號分隔（例如：./logo.png 或 ./images）")
        .validate_with(|input: &String| -> Result<(), String> {
            let paths = split_list(input);
            if paths.is_empty() {
                return Err("請至少輸入一個路徑".to_string());
            }
            match paths.iter().find(|p| !Path::new(p).exists()) {
                Some(missing) => Err(format!("路徑 '{}' 不存在", missing)),
                None => Ok(()),
            }
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(split_list(&raw))
}

pub fn get_output_path(inputs: &[String]) -> io::Result<String> {
    let default = default_output(inputs);
    Input::new()
        .with_prompt("輸入輸出位置（單一圖片可指定 .ico 檔名，批次為輸出目錄）")
        .default(default)
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

/// 單一圖片預設輸出為同名 .ico，其他情況為 output 目錄
pub fn default_output(inputs: &[String]) -> String {
    match inputs {
        [single] if Path::new(single).is_file() => Path::new(single)
            .with_extension("ico")
            .to_string_lossy()
            .to_string(),
        _ => "output".to_string(),
    }
}

pub fn get_sizes() -> io::Result<Vec<u32>> {
    let labels: Vec<String> = STANDARD_SIZES.iter().map(|s| format!("{}x{}", s, s)).collect();
    let defaults: Vec<bool> = STANDARD_SIZES.iter().map(|s| DEFAULT_SIZES.contains(s)).collect();
    let chosen = MultiSelect::new()
        .with_prompt("選擇圖標尺寸（空白鍵勾選，按 Enter 確認）")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("尺寸選擇失敗: {}", e)))?;
    let sizes: Vec<u32> = chosen.into_iter().map(|i| STANDARD_SIZES[i]).collect();
    validate_sizes(&sizes)?;
    Ok(sizes)
}

pub fn get_preserve_aspect_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否保持寬高比（居中填充）？")
        .default(true)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("寬高比選項輸入失敗: {}", e)))
}

pub fn get_force_alpha_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否強制添加透明通道？")
        .default(false)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("透明通道選項輸入失敗: {}", e)))
}

pub fn get_history_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否記錄轉換歷史？")
        .default(true)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("歷史選項輸入失敗: {}", e)))
}

fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// 交互配置適配器
pub struct InteractiveConfigAdapter {
    inputs: Vec<String>,
    output: String,
}

impl InteractiveConfigAdapter {
    pub fn new(inputs: Vec<String>, output: String) -> Self {
        InteractiveConfigAdapter { inputs, output }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let sizes = get_sizes()?;
        let preserve_aspect_ratio = get_preserve_aspect_option()?;
        let force_alpha_channel = get_force_alpha_option()?;
        let keep_history = get_history_option()?;

        Ok(AppConfig {
            inputs: self.inputs.clone(),
            output: self.output.clone(),
            sizes,
            preserve_aspect_ratio,
            force_alpha_channel,
            parallel: false,
            include: vec!["*".to_string()],
            exclude: None,
            no_progress: false,
            history_db: keep_history.then(|| DEFAULT_HISTORY_DB.to_string()),
        })
    }
}
