// ==========================================
// 仓储作业管理系统 - 破损报告仓储
// ==========================================
// 职责: damage_report / damage_item 表的聚合读写
// 红线: Repository 不含业务逻辑；明细整体重写保证与内存聚合一致
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::report::{DamageItem, DamageReport, DamageReportSummary};
use crate::domain::types::ReportStatus;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// DamageReportRepository - 破损报告仓储
// ==========================================
pub struct DamageReportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DamageReportRepository {
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

    /// 保存聚合（头表 upsert + 明细整体重写，事务化）
    ///
    /// # 说明
    /// 明细以“删除后按当前顺序重插”的方式落库，
    /// 数据库中的 item_number 永远与内存聚合一致
    pub fn save(&self, report: &DamageReport) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO damage_report (
                report_id, driver_name, plate_number, status, created_by,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(report_id) DO UPDATE SET
                driver_name = excluded.driver_name,
                plate_number = excluded.plate_number,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
            params![
                report.report_id,
                report.driver_name,
                report.plate_number,
                report.status.to_string(),
                report.created_by,
                report.created_at.to_rfc3339(),
                report.updated_at.to_rfc3339(),
            ],
        )?;

        tx.execute(
            "DELETE FROM damage_item WHERE report_id = ?1",
            params![report.report_id],
        )?;

        for item in &report.items {
            tx.execute(
                r#"
                INSERT INTO damage_item (
                    report_id, item_number, barcode, material_code,
                    material_description, damage_type, damage_description, photo_url
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    report.report_id,
                    item.item_number,
                    item.barcode,
                    item.material_code,
                    item.material_description,
                    item.damage_type,
                    item.damage_description,
                    item.photo_url,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 按 report_id 读取完整聚合（明细按 item_number 升序）
    pub fn find_by_id(&self, report_id: &str) -> RepositoryResult<Option<DamageReport>> {
        let conn = self.get_conn()?;

        let header = conn
            .query_row(
                r#"
                SELECT report_id, driver_name, plate_number, status, created_by,
                       created_at, updated_at
                FROM damage_report
                WHERE report_id = ?1
                "#,
                params![report_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        let (id, driver_name, plate_number, status_raw, created_by, created_at, updated_at) =
            match header {
                Some(h) => h,
                None => return Ok(None),
            };

        let status = ReportStatus::parse(&status_raw).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "status".to_string(),
                message: format!("未知报告状态: {}", status_raw),
            }
        })?;

        let mut stmt = conn.prepare(
            r#"
            SELECT item_number, barcode, material_code, material_description,
                   damage_type, damage_description, photo_url
            FROM damage_item
            WHERE report_id = ?1
            ORDER BY item_number
            "#,
        )?;

        let items = stmt
            .query_map(params![id], |row| {
                Ok(DamageItem {
                    item_number: row.get(0)?,
                    barcode: row.get(1)?,
                    material_code: row.get(2)?,
                    material_description: row.get(3)?,
                    damage_type: row.get(4)?,
                    damage_description: row.get(5)?,
                    photo_url: row.get(6)?,
                })
            })?
            .collect::<SqliteResult<Vec<DamageItem>>>()?;

        Ok(Some(DamageReport {
            report_id: id,
            driver_name,
            plate_number,
            status,
            items,
            created_by,
            created_at: created_at
                .parse::<chrono::DateTime<chrono::Utc>>()
                .unwrap_or_else(|_| Utc::now()),
            updated_at: updated_at
                .parse::<chrono::DateTime<chrono::Utc>>()
                .unwrap_or_else(|_| Utc::now()),
        }))
    }

    /// 列表页查询（可选状态过滤，按创建时间倒序，带分页）
    pub fn list_summaries(
        &self,
        status: Option<ReportStatus>,
        limit: i32,
        offset: i32,
    ) -> RepositoryResult<Vec<DamageReportSummary>> {
        let conn = self.get_conn()?;

        let sql = r#"
            SELECT r.report_id, r.driver_name, r.plate_number, r.status,
                   COUNT(i.report_id) AS item_count, r.created_at
            FROM damage_report r
            LEFT JOIN damage_item i ON i.report_id = r.report_id
            WHERE (?1 IS NULL OR r.status = ?1)
            GROUP BY r.report_id
            ORDER BY r.created_at DESC
            LIMIT ?2 OFFSET ?3
        "#;

        let status_filter = status.map(|s| s.to_string());
        let mut stmt = conn.prepare(sql)?;
        let summaries = stmt
            .query_map(params![status_filter, limit, offset], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        let mut result = Vec::with_capacity(summaries.len());
        for (report_id, driver_name, plate_number, status_raw, item_count, created_at) in summaries
        {
            let status = ReportStatus::parse(&status_raw).ok_or_else(|| {
                RepositoryError::FieldValueError {
                    field: "status".to_string(),
                    message: format!("未知报告状态: {}", status_raw),
                }
            })?;
            result.push(DamageReportSummary {
                report_id,
                driver_name,
                plate_number,
                status,
                item_count,
                created_at: created_at
                    .parse::<chrono::DateTime<chrono::Utc>>()
                    .unwrap_or_else(|_| Utc::now()),
            });
        }
        Ok(result)
    }
}
