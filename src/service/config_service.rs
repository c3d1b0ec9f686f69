use std::io;
use crate::config::config::DEFAULT_SIZES;
use crate::config::ports::{AppConfig, ConfigPort};
use crate::service::history::DEFAULT_HISTORY_DB;

// 配置服務，負責選擇適當的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        self.config_port.get_config()
    }
}

// 預設配置適配器
pub struct DefaultConfigAdapter {
    inputs: Vec<String>,
    output: String,
}

impl DefaultConfigAdapter {
    pub fn new(inputs: Vec<String>, output: String) -> Self {
        DefaultConfigAdapter { inputs, output }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        Ok(AppConfig {
            inputs: self.inputs.clone(),
            output: self.output.clone(),
            sizes: DEFAULT_SIZES.to_vec(),
            preserve_aspect_ratio: true, // 居中填充
            force_alpha_channel: false,
            parallel: false,
            include: vec!["*".to_string()],
            exclude: None,
            no_progress: false,
            history_db: Some(DEFAULT_HISTORY_DB.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_adapter_fills_standard_options() {
        let service = ConfigService::new(Box::new(DefaultConfigAdapter::new(
            vec!["logo.png".to_string()],
            "logo.ico".to_string(),
        )));
        let config = service.get_config().unwrap();
        assert_eq!(config.sizes, DEFAULT_SIZES.to_vec());
        assert!(config.preserve_aspect_ratio);
        assert!(!config.force_alpha_channel);
        assert_eq!(config.history_db.as_deref(), Some(DEFAULT_HISTORY_DB));
    }
}
