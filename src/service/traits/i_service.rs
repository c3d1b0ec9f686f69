use std::io;
use std::path::Path;
use crate::models::conversion::{ConversionRequest, ConversionResult, IconFrame};
use crate::models::file::{FileCollectInput, FileCollectOutput, ImageInfo};
use crate::models::history::HistoryRecord;

// File 服務接口，負責收集來源圖片
pub trait FileServiceTrait: Send + Sync {
    /// 收集符合條件的圖片檔案
    /// # 參數
    /// - input: 檔案收集的輸入參數
    /// # 回傳
    /// - 成功時返回圖片列表與略過數量，輸入路徑不存在時返回 IO 錯誤
    fn collect_images(&self, input: FileCollectInput) -> io::Result<FileCollectOutput>;

    /// 讀取圖片的基本資訊（名稱、尺寸、格式、色彩模式）
    fn inspect_image(&self, path: &Path) -> io::Result<ImageInfo>;
}

// Icon 服務接口，負責單一圖片轉換為 ICO
pub trait IconServiceTrait: Send + Sync {
    /// 將來源圖片轉換為多尺寸 ICO 檔案
    /// # 參數
    /// - request: 來源、輸出、尺寸與選項
    /// # 回傳
    /// - 轉換結果；失敗時帶有錯誤種類，不會留下損壞的輸出檔
    fn convert(&self, request: &ConversionRequest) -> ConversionResult;
}

// ICO 寫出接口，影格已依尺寸由小到大排序
pub trait IconWriterTrait: Send + Sync {
    fn write_icon(&self, frames: &[IconFrame], output_path: &Path) -> io::Result<()>;
}

// History 服務接口，負責轉換歷史記錄
pub trait HistoryServiceTrait: Send + Sync {
    /// 新增一筆記錄，返回新記錄的 id
    fn add_record(&self, source_path: &Path, output_path: &Path, sizes: &[u32]) -> io::Result<i64>;

    /// 取得最近的記錄，最新的在前
    fn recent(&self, limit: usize) -> io::Result<Vec<HistoryRecord>>;

    /// 清除所有記錄，返回被刪除的記錄數
    fn clear(&self) -> io::Result<usize>;

    /// 關閉底層連線
    fn close(self: Box<Self>) -> io::Result<()>;
}
