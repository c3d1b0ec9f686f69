use std::io;
use std::sync::atomic::AtomicBool;
use crate::models::batch::{BatchInput, BatchOutput, ProgressEvent};

// Facade 接口，負責協調批次圖片轉換流程
pub trait ConversionFacadeTrait: Send + Sync {
    /// 依序（或平行）轉換所有來源圖片
    /// # 參數
    /// - input: 批次轉換的輸入參數
    /// - progress: 每個檔案開始與結束時的通知
    /// - cancel: 設定後不再開始新的檔案，進行中的檔案照常完成
    /// # 回傳
    /// - 每個檔案的結果與成功/總數統計；個別檔案失敗不會使整批失敗
    fn execute_batch(
        &self,
        input: BatchInput,
        progress: &(dyn Fn(ProgressEvent) + Sync),
        cancel: &AtomicBool,
    ) -> io::Result<BatchOutput>;
}
