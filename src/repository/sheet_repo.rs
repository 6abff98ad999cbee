// ==========================================
// 仓储作业管理系统 - 表格批次仓储
// ==========================================
// 职责: sheet_batch / sheet_row 表的数据访问
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::sheet::{SheetBatch, SheetRow};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// SheetRepository - 表格批次仓储
// ==========================================
pub struct SheetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SheetRepository {
    /// 创建新的仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批次 + 行数据一次性落库（事务化）
    pub fn insert_batch(&self, batch: &SheetBatch, rows: &[SheetRow]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO sheet_batch (
                batch_id, file_name, total_rows, success_rows, blocked_rows,
                warning_rows, conflict_rows, imported_at, imported_by,
                elapsed_ms, dq_report_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                batch.batch_id,
                batch.file_name,
                batch.total_rows,
                batch.success_rows,
                batch.blocked_rows,
                batch.warning_rows,
                batch.conflict_rows,
                batch.imported_at.map(|dt| dt.to_rfc3339()),
                batch.imported_by,
                batch.elapsed_ms,
                batch.dq_report_json,
            ],
        )?;

        for row in rows {
            tx.execute(
                r#"
                INSERT INTO sheet_row (batch_id, row_number, row_key, data_json)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![row.batch_id, row.row_number, row.row_key, row.data_json],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 按批次 ID 查询批次元信息
    pub fn find_batch(&self, batch_id: &str) -> RepositoryResult<Option<SheetBatch>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT batch_id, file_name, total_rows, success_rows, blocked_rows,
                       warning_rows, conflict_rows, imported_at, imported_by,
                       elapsed_ms, dq_report_json
                FROM sheet_batch
                WHERE batch_id = ?1
                "#,
                params![batch_id],
                Self::map_batch,
            )
            .optional()?;
        Ok(result)
    }

    /// 批次列表（按导入时间倒序，带分页）
    pub fn list_batches(&self, limit: i32, offset: i32) -> RepositoryResult<Vec<SheetBatch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, file_name, total_rows, success_rows, blocked_rows,
                   warning_rows, conflict_rows, imported_at, imported_by,
                   elapsed_ms, dq_report_json
            FROM sheet_batch
            ORDER BY imported_at DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )?;

        let batches = stmt
            .query_map(params![limit, offset], Self::map_batch)?
            .collect::<SqliteResult<Vec<SheetBatch>>>()?;
        Ok(batches)
    }

    /// 浏览批次行数据（按行号升序，带分页）
    pub fn list_rows(
        &self,
        batch_id: &str,
        limit: i32,
        offset: i32,
    ) -> RepositoryResult<Vec<SheetRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, row_number, row_key, data_json
            FROM sheet_row
            WHERE batch_id = ?1
            ORDER BY row_number
            LIMIT ?2 OFFSET ?3
            "#,
        )?;

        let rows = stmt
            .query_map(params![batch_id, limit, offset], |row| {
                Ok(SheetRow {
                    batch_id: row.get(0)?,
                    row_number: row.get(1)?,
                    row_key: row.get(2)?,
                    data_json: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<SheetRow>>>()?;
        Ok(rows)
    }

    fn map_batch(row: &rusqlite::Row<'_>) -> SqliteResult<SheetBatch> {
        Ok(SheetBatch {
            batch_id: row.get(0)?,
            file_name: row.get(1)?,
            total_rows: row.get(2)?,
            success_rows: row.get(3)?,
            blocked_rows: row.get(4)?,
            warning_rows: row.get(5)?,
            conflict_rows: row.get(6)?,
            imported_at: row
                .get::<_, Option<String>>(7)?
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&chrono::Utc)),
            imported_by: row.get(8)?,
            elapsed_ms: row.get(9)?,
            dq_report_json: row.get(10)?,
        })
    }
}
