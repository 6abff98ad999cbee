// ==========================================
// 仓储作业管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ===== 配置键 =====
/// 远端映射查询超时（毫秒）
pub const KEY_REMOTE_TIMEOUT_MS: &str = "resolver/remote_timeout_ms";
/// 单批次导入数据行上限
pub const KEY_IMPORT_MAX_ROWS: &str = "import/max_rows";

// ===== 默认值 =====
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_IMPORT_MAX_ROWS: usize = 10_000;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（upsert）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 远端映射查询超时（毫秒）；值缺失或非法时回落默认值
    pub fn remote_timeout_ms(&self) -> u64 {
        match self.get_config_value(KEY_REMOTE_TIMEOUT_MS) {
            Ok(Some(v)) => v.parse::<u64>().unwrap_or_else(|_| {
                warn!(key = KEY_REMOTE_TIMEOUT_MS, value = %v, "配置值非法，使用默认值");
                DEFAULT_REMOTE_TIMEOUT_MS
            }),
            Ok(None) => DEFAULT_REMOTE_TIMEOUT_MS,
            Err(e) => {
                warn!(key = KEY_REMOTE_TIMEOUT_MS, error = %e, "配置读取失败，使用默认值");
                DEFAULT_REMOTE_TIMEOUT_MS
            }
        }
    }

    /// 单批次导入数据行上限；值缺失或非法时回落默认值
    pub fn import_max_rows(&self) -> usize {
        match self.get_config_value(KEY_IMPORT_MAX_ROWS) {
            Ok(Some(v)) => v.parse::<usize>().unwrap_or_else(|_| {
                warn!(key = KEY_IMPORT_MAX_ROWS, value = %v, "配置值非法，使用默认值");
                DEFAULT_IMPORT_MAX_ROWS
            }),
            Ok(None) => DEFAULT_IMPORT_MAX_ROWS,
            Err(e) => {
                warn!(key = KEY_IMPORT_MAX_ROWS, error = %e, "配置读取失败，使用默认值");
                DEFAULT_IMPORT_MAX_ROWS
            }
        }
    }

    /// 获取所有 global 配置的快照（JSON 格式）
    ///
    /// # 用途
    /// - 问题排查时一次性导出生效配置
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global'")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot: HashMap<String, String> = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }

        Ok(json!(snapshot).to_string())
    }
}
