use std::io;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use log::{info, warn};
use crate::config::config::{validate_file_patterns, validate_sizes};
use crate::config::ports::{AppConfig, ConversionPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::task::BatchTask;
use crate::models::batch::{BatchInput, BatchOutput};
use crate::service::file::FileService;
use crate::service::history::HistoryStore;
use crate::service::icon::IconService;
use crate::service::traits::i_service::HistoryServiceTrait;
use crate::utils::utils::{build_runtime, format_sizes, ProgressManager};

// 轉換執行適配器：建立服務、在背景執行批次並顯示進度
pub struct ConversionAdapter;

impl ConversionPort for ConversionAdapter {
    fn execute(&self, config: AppConfig) -> io::Result<String> {
        validate_sizes(&config.sizes)?;
        validate_file_patterns(&config.include, &config.exclude)?;

        let history: Option<Box<dyn HistoryServiceTrait>> = match &config.history_db {
            Some(db) => Some(Box::new(HistoryStore::open(Path::new(db))?)),
            None => None,
        };
        let facade = Arc::new(ConversionFacade::new(
            Box::new(FileService::new()),
            Box::new(IconService::new()),
            history,
        ));

        let input = BatchInput::from(&config);
        info!("圖示尺寸：{}", format_sizes(&input.sizes));

        let runtime = build_runtime()?;
        let output = runtime.block_on(run_batch(Arc::clone(&facade), input, config.no_progress))?;

        match Arc::try_unwrap(facade) {
            Ok(facade) => facade.shutdown()?,
            Err(_) => warn!("轉換工作仍持有歷史記錄連線，交由釋放時關閉"),
        }

        Ok(summarize(&output))
    }
}

async fn run_batch(facade: Arc<ConversionFacade>, input: BatchInput, no_progress: bool) -> io::Result<BatchOutput> {
    let mut task = BatchTask::spawn(facade, input);

    let cancel = task.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("收到中斷訊號，完成目前檔案後停止");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let pm = ProgressManager::new(no_progress);
    while let Some(event) = task.next_progress().await {
        pm.handle(&event);
    }
    let output = task.join().await?;
    pm.finish(output.success_count, output.total_count);
    Ok(output)
}

/// 單檔時回報輸出路徑或錯誤訊息，批次時回報成功數與總數
pub fn summarize(output: &BatchOutput) -> String {
    if output.total_count == 0 {
        return "沒有找到可轉換的圖片".to_string();
    }

    if !output.is_batch {
        if let Some(result) = output.results.first().and_then(|o| o.result.as_ref()) {
            return match &result.error {
                None => format!("轉換完成！保存到：{}", result.output_path.display()),
                Some(e) => format!("轉換失敗：{}", e),
            };
        }
    }

    let mut summary = format!(
        "已完成 {}/{} 個檔案的轉換！輸出目錄：{}",
        output.success_count,
        output.total_count,
        output.output_dir.display()
    );
    if output.skipped_count > 0 {
        summary.push_str(&format!("（已取消 {} 個）", output.skipped_count));
    }
    summary
}
