use std::io;
use std::path::Path;
use clap::Parser;
use dialoguer::Confirm;
use crate::action::interactive::process_interactive_mode;
use crate::config::config::{validate_file_patterns, validate_sizes, Cli, Command, ConvertArgs};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::service::config_service::ConfigService;
use crate::service::file::FileService;
use crate::service::history::HistoryStore;
use crate::service::traits::i_service::{FileServiceTrait, HistoryServiceTrait};
use crate::utils::convert::ConversionAdapter;
use crate::utils::utils::setup_logging;

pub fn process_args(args: Vec<String>) -> io::Result<String> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<String> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    match cli.command.clone() {
        Command::Convert(args) => {
            let config_service = ConfigService::new(Box::new(CliConfigAdapter::new(args, cli.db.clone())));
            let config = config_service.get_config()?;
            ConversionAdapter.execute(config)
        }
        Command::History { limit } => show_history(Path::new(&cli.db), limit),
        Command::ClearHistory { yes } => clear_history(Path::new(&cli.db), yes),
        Command::Info { path } => {
            let info = FileService::new().inspect_image(Path::new(&path))?;
            Ok(info.to_string())
        }
    }
}

pub fn show_history(db_path: &Path, limit: usize) -> io::Result<String> {
    let store = HistoryStore::open(db_path)?;
    let records = store.recent(limit)?;
    store.shutdown()?;

    if records.is_empty() {
        return Ok("尚無轉換歷史".to_string());
    }
    let lines: Vec<String> = records.iter().map(|r| r.to_string()).collect();
    Ok(lines.join("\n"))
}

pub fn clear_history(db_path: &Path, skip_confirm: bool) -> io::Result<String> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("確定要清除所有轉換歷史記錄嗎？此操作不可撤銷！")
            .default(false)
            .interact()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("確認輸入失敗: {}", e)))?;
        if !confirmed {
            return Ok("已取消清除".to_string());
        }
    }

    let store = HistoryStore::open(db_path)?;
    let removed = store.clear()?;
    store.shutdown()?;
    Ok(format!("已清除 {} 條歷史記錄", removed))
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    args: ConvertArgs,
    db: String,
}

impl CliConfigAdapter {
    pub fn new(args: ConvertArgs, db: String) -> Self {
        CliConfigAdapter { args, db }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        validate_sizes(&self.args.sizes)?;
        validate_file_patterns(&self.args.include, &self.args.exclude)?;

        if self.args.inputs.len() > 1 && self.args.output.to_lowercase().ends_with(".ico") {
            log::warn!("多個輸入但輸出為單一 ICO 檔案，將改用其所在目錄：{}", self.args.output);
        }

        Ok(AppConfig {
            inputs: self.args.inputs.clone(),
            output: self.args.output.clone(),
            sizes: self.args.sizes.clone(),
            preserve_aspect_ratio: !self.args.no_preserve_aspect,
            force_alpha_channel: self.args.force_alpha,
            parallel: self.args.parallel,
            include: self.args.include.clone(),
            exclude: self.args.exclude.clone(),
            no_progress: self.args.no_progress,
            history_db: if self.args.no_history { None } else { Some(self.db.clone()) },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> ConvertArgs {
        let mut argv = vec!["image_to_ico", "convert", "logo.png"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Convert(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn cli_adapter_maps_flags() {
        let adapter = CliConfigAdapter::new(
            args(&["--no-preserve-aspect", "--force-alpha", "--no-history", "--sizes", "48"]),
            "history.db".to_string(),
        );
        let config = adapter.get_config().unwrap();
        assert!(!config.preserve_aspect_ratio);
        assert!(config.force_alpha_channel);
        assert_eq!(config.sizes, vec![48]);
        assert_eq!(config.history_db, None);
    }

    #[test]
    fn cli_adapter_rejects_invalid_sizes() {
        let adapter = CliConfigAdapter::new(args(&["--sizes", "0"]), "history.db".to_string());
        assert_eq!(adapter.get_config().unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn history_commands_list_and_clear() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("history.db");
        assert_eq!(show_history(&db, 10).unwrap(), "尚無轉換歷史");

        let store = HistoryStore::open(&db).unwrap();
        store.add_record(Path::new("/x/logo.png"), Path::new("/y/logo.ico"), &[16]).unwrap();
        store.shutdown().unwrap();

        assert!(show_history(&db, 10).unwrap().contains("logo.png → logo.ico"));
        assert_eq!(clear_history(&db, true).unwrap(), "已清除 1 條歷史記錄");
    }
}
