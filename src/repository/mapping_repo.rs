// ==========================================
// 仓储作业管理系统 - 条码映射仓储
// ==========================================
// 职责: material_mapping / material_catalog 表的数据访问
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::material::MaterialMapping;
use crate::engine::resolver::MappingLookup;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// MaterialMappingRepository - 条码映射仓储
// ==========================================
/// 条码映射仓储
/// 职责: 条码 → 物料映射的点查与补录，静态目录的加载
pub struct MaterialMappingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaterialMappingRepository {
    /// 创建新的仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按条码等值点查映射行（至多一行）
    pub fn find_mapping(&self, barcode: &str) -> RepositoryResult<Option<MaterialMapping>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT barcode, material_code, material_description, category,
                       created_at, updated_at
                FROM material_mapping
                WHERE barcode = ?1
                "#,
                params![barcode],
                Self::map_row,
            )
            .optional()?;
        Ok(result)
    }

    /// 补录/覆盖一条映射（人工为未解析条码补充描述后落库）
    pub fn upsert_mapping(&self, mapping: &MaterialMapping) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO material_mapping (
                barcode, material_code, material_description, category,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(barcode) DO UPDATE SET
                material_code = excluded.material_code,
                material_description = excluded.material_description,
                category = excluded.category,
                updated_at = excluded.updated_at
            "#,
            params![
                mapping.barcode,
                mapping.material_code,
                mapping.material_description,
                mapping.category,
                mapping.created_at.to_rfc3339(),
                mapping.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 查询映射列表（带分页，维护页用）
    pub fn list_mappings(&self, limit: i32, offset: i32) -> RepositoryResult<Vec<MaterialMapping>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT barcode, material_code, material_description, category,
                   created_at, updated_at
            FROM material_mapping
            ORDER BY barcode
            LIMIT ?1 OFFSET ?2
            "#,
        )?;

        let mappings = stmt
            .query_map(params![limit, offset], Self::map_row)?
            .collect::<SqliteResult<Vec<MaterialMapping>>>()?;
        Ok(mappings)
    }

    /// 加载静态目录全量条目（启动时装入内存目录）
    ///
    /// # 返回
    /// - Vec<(material_code, model, category)>
    pub fn load_catalog_entries(&self) -> RepositoryResult<Vec<(String, String, String)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT material_code, model, category FROM material_catalog ORDER BY material_code",
        )?;

        let entries = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<SqliteResult<Vec<(String, String, String)>>>()?;
        Ok(entries)
    }

    /// 写入/覆盖一条目录条目（预置数据维护）
    pub fn upsert_catalog_entry(
        &self,
        material_code: &str,
        model: &str,
        category: &str,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO material_catalog (material_code, model, category)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(material_code) DO UPDATE SET
                model = excluded.model,
                category = excluded.category
            "#,
            params![material_code, model, category],
        )?;
        Ok(())
    }

    fn map_row(row: &rusqlite::Row<'_>) -> SqliteResult<MaterialMapping> {
        Ok(MaterialMapping {
            barcode: row.get(0)?,
            material_code: row.get(1)?,
            material_description: row.get(2)?,
            category: row.get(3)?,
            created_at: row
                .get::<_, String>(4)?
                .parse::<chrono::DateTime<chrono::Utc>>()
                .unwrap_or_else(|_| Utc::now()),
            updated_at: row
                .get::<_, String>(5)?
                .parse::<chrono::DateTime<chrono::Utc>>()
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

// ==========================================
// MappingLookup 实现 - 解析器的远端点查依赖
// ==========================================
#[async_trait]
impl MappingLookup for MaterialMappingRepository {
    async fn find_by_barcode(&self, barcode: &str) -> RepositoryResult<Option<MaterialMapping>> {
        self.find_mapping(barcode)
    }
}
