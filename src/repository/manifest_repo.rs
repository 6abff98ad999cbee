// ==========================================
// 仓储作业管理系统 - 行程单仓储
// ==========================================
// 职责: trip_manifest / manifest_item 表的聚合读写
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::manifest::{ManifestItem, TripManifest};
use crate::domain::types::ManifestStatus;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// TripManifestRepository - 行程单仓储
// ==========================================
pub struct TripManifestRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TripManifestRepository {
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

    /// 保存聚合（头表 upsert + 单据行整体重写，事务化）
    pub fn save(&self, manifest: &TripManifest) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO trip_manifest (
                manifest_id, driver_name, plate_number, destination, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(manifest_id) DO UPDATE SET
                driver_name = excluded.driver_name,
                plate_number = excluded.plate_number,
                destination = excluded.destination,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
            params![
                manifest.manifest_id,
                manifest.driver_name,
                manifest.plate_number,
                manifest.destination,
                manifest.status.to_string(),
                manifest.created_at.to_rfc3339(),
                manifest.updated_at.to_rfc3339(),
            ],
        )?;

        tx.execute(
            "DELETE FROM manifest_item WHERE manifest_id = ?1",
            params![manifest.manifest_id],
        )?;

        for item in &manifest.items {
            tx.execute(
                r#"
                INSERT INTO manifest_item (manifest_id, item_number, document_no, description)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    manifest.manifest_id,
                    item.item_number,
                    item.document_no,
                    item.description,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 按 manifest_id 读取完整聚合
    pub fn find_by_id(&self, manifest_id: &str) -> RepositoryResult<Option<TripManifest>> {
        let conn = self.get_conn()?;

        let header = conn
            .query_row(
                r#"
                SELECT manifest_id, driver_name, plate_number, destination, status,
                       created_at, updated_at
                FROM trip_manifest
                WHERE manifest_id = ?1
                "#,
                params![manifest_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        let (id, driver_name, plate_number, destination, status_raw, created_at, updated_at) =
            match header {
                Some(h) => h,
                None => return Ok(None),
            };

        let status = ManifestStatus::parse(&status_raw).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "status".to_string(),
                message: format!("未知行程单状态: {}", status_raw),
            }
        })?;

        let mut stmt = conn.prepare(
            r#"
            SELECT item_number, document_no, description
            FROM manifest_item
            WHERE manifest_id = ?1
            ORDER BY item_number
            "#,
        )?;

        let items = stmt
            .query_map(params![id], |row| {
                Ok(ManifestItem {
                    item_number: row.get(0)?,
                    document_no: row.get(1)?,
                    description: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<ManifestItem>>>()?;

        Ok(Some(TripManifest {
            manifest_id: id,
            driver_name,
            plate_number,
            destination,
            status,
            items,
            created_at: created_at
                .parse::<chrono::DateTime<chrono::Utc>>()
                .unwrap_or_else(|_| Utc::now()),
            updated_at: updated_at
                .parse::<chrono::DateTime<chrono::Utc>>()
                .unwrap_or_else(|_| Utc::now()),
        }))
    }

    /// 列表查询（按创建时间倒序，带分页；单据行随聚合读出）
    pub fn list_all(&self, limit: i32, offset: i32) -> RepositoryResult<Vec<TripManifest>> {
        let ids: Vec<String> = {
            let conn = self.get_conn()?;
            let mut stmt = conn.prepare(
                "SELECT manifest_id FROM trip_manifest ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
            )?;
            let rows = stmt
                .query_map(params![limit, offset], |row| row.get::<_, String>(0))?
                .collect::<SqliteResult<Vec<String>>>()?;
            rows
        };

        let mut manifests = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(manifest) = self.find_by_id(&id)? {
                manifests.push(manifest);
            }
        }
        Ok(manifests)
    }
}
