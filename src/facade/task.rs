use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::batch::{BatchInput, BatchOutput, ProgressEvent};

/// 在背景工作執行緒上執行的批次轉換
pub struct BatchTask {
    handle: JoinHandle<io::Result<BatchOutput>>,
    progress: mpsc::UnboundedReceiver<ProgressEvent>,
    cancel: Arc<AtomicBool>,
}

impl BatchTask {
    /// 必須在 tokio runtime 內呼叫
    pub fn spawn(facade: Arc<dyn ConversionFacadeTrait>, input: BatchInput) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let handle = tokio::task::spawn_blocking(move || {
            let notify = move |event: ProgressEvent| {
                // 接收端已關閉時不影響轉換
                let _ = tx.send(event);
            };
            facade.execute_batch(input, &notify, &flag)
        });

        BatchTask {
            handle,
            progress: rx,
            cancel,
        }
    }

    /// 要求取消，尚未開始的檔案會被跳過
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// 批次結束後返回 None
    pub async fn next_progress(&mut self) -> Option<ProgressEvent> {
        self.progress.recv().await
    }

    pub async fn join(self) -> io::Result<BatchOutput> {
        self.handle
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("轉換工作異常結束: {}", e)))?
    }
}
