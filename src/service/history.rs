use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use chrono::NaiveDateTime;
use log::{debug, info};
use rusqlite::{params, Connection};
use crate::models::history::{join_sizes, HistoryRecord};
use crate::service::traits::i_service::HistoryServiceTrait;

pub const DEFAULT_HISTORY_DB: &str = "conversion_history.db";

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS conversion_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        source_path TEXT NOT NULL,
        output_path TEXT NOT NULL,
        sizes TEXT NOT NULL,
        timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
    )";

/// 轉換歷史記錄，由呼叫端明確開啟與關閉
pub struct HistoryStore {
    conn: Mutex<Connection>,
    location: String,
}

impl HistoryStore {
    pub fn open(db_path: &Path) -> io::Result<Self> {
        let conn = Connection::open(db_path).map_err(to_io_error)?;
        Self::from_connection(conn, db_path.display().to_string())
    }

    pub fn open_in_memory() -> io::Result<Self> {
        let conn = Connection::open_in_memory().map_err(to_io_error)?;
        Self::from_connection(conn, ":memory:".to_string())
    }

    fn from_connection(conn: Connection, location: String) -> io::Result<Self> {
        conn.execute_batch(CREATE_TABLE).map_err(to_io_error)?;
        debug!("開啟歷史記錄資料庫：{}", location);
        Ok(HistoryStore {
            conn: Mutex::new(conn),
            location,
        })
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "歷史記錄連線鎖已失效"))
    }

    /// 關閉連線並回報關閉時的錯誤；直接丟棄也會釋放連線
    pub fn shutdown(self) -> io::Result<()> {
        let location = self.location;
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "歷史記錄連線鎖已失效"))?;
        conn.close().map_err(|(_, e)| to_io_error(e))?;
        debug!("關閉歷史記錄資料庫：{}", location);
        Ok(())
    }
}

impl HistoryServiceTrait for HistoryStore {
    fn add_record(&self, source_path: &Path, output_path: &Path, sizes: &[u32]) -> io::Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO conversion_history (source_path, output_path, sizes) VALUES (?1, ?2, ?3)",
            params![
                source_path.to_string_lossy().into_owned(),
                output_path.to_string_lossy().into_owned(),
                join_sizes(sizes)
            ],
        )
        .map_err(to_io_error)?;
        let id = conn.last_insert_rowid();
        debug!("新增歷史記錄 #{}：{}", id, source_path.display());
        Ok(id)
    }

    fn recent(&self, limit: usize) -> io::Result<Vec<HistoryRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, source_path, output_path, sizes, timestamp
                 FROM conversion_history
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?1",
            )
            .map_err(to_io_error)?;
        let records = stmt
            .query_map(params![limit as i64], |row| {
                Ok(HistoryRecord {
                    id: row.get(0)?,
                    source_path: PathBuf::from(row.get::<_, String>(1)?),
                    output_path: PathBuf::from(row.get::<_, String>(2)?),
                    sizes: row.get(3)?,
                    timestamp: row.get::<_, NaiveDateTime>(4)?,
                })
            })
            .map_err(to_io_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_io_error)?;
        Ok(records)
    }

    fn clear(&self) -> io::Result<usize> {
        let conn = self.lock()?;
        let removed = conn
            .execute("DELETE FROM conversion_history", [])
            .map_err(to_io_error)?;
        info!("已清除 {} 條歷史記錄", removed);
        Ok(removed)
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        (*self).shutdown()
    }
}

fn to_io_error(e: rusqlite::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("歷史記錄資料庫錯誤: {}", e))
}
