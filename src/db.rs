// ==========================================
// 仓储作业管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供幂等建表入口（嵌入式部署，无独立迁移工具）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化数据库 schema（幂等）
///
/// # 表清单
/// - schema_version: 版本记录
/// - config_kv: 配置键值（scope_id + key）
/// - material_mapping: 条码 → 物料映射（远端映射表的本地落位）
/// - material_catalog: 静态物料目录（code → model/category）
/// - damage_report / damage_item: 破损报告聚合
/// - trip_manifest / manifest_item: 行程单聚合
/// - sheet_batch / sheet_row: 表格导入批次与行数据
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS material_mapping (
            barcode TEXT PRIMARY KEY,
            material_code TEXT NOT NULL,
            material_description TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS material_catalog (
            material_code TEXT PRIMARY KEY,
            model TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS damage_report (
            report_id TEXT PRIMARY KEY,
            driver_name TEXT NOT NULL DEFAULT '',
            plate_number TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'DRAFT',
            created_by TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS damage_item (
            report_id TEXT NOT NULL REFERENCES damage_report(report_id) ON DELETE CASCADE,
            item_number INTEGER NOT NULL,
            barcode TEXT NOT NULL DEFAULT '',
            material_code TEXT NOT NULL DEFAULT '',
            material_description TEXT NOT NULL DEFAULT '',
            damage_type TEXT NOT NULL DEFAULT '',
            damage_description TEXT NOT NULL DEFAULT '',
            photo_url TEXT,
            PRIMARY KEY (report_id, item_number)
        );

        CREATE TABLE IF NOT EXISTS trip_manifest (
            manifest_id TEXT PRIMARY KEY,
            driver_name TEXT NOT NULL DEFAULT '',
            plate_number TEXT NOT NULL DEFAULT '',
            destination TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'DRAFT',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS manifest_item (
            manifest_id TEXT NOT NULL REFERENCES trip_manifest(manifest_id) ON DELETE CASCADE,
            item_number INTEGER NOT NULL,
            document_no TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (manifest_id, item_number)
        );

        CREATE TABLE IF NOT EXISTS sheet_batch (
            batch_id TEXT PRIMARY KEY,
            file_name TEXT,
            total_rows INTEGER NOT NULL DEFAULT 0,
            success_rows INTEGER NOT NULL DEFAULT 0,
            blocked_rows INTEGER NOT NULL DEFAULT 0,
            warning_rows INTEGER NOT NULL DEFAULT 0,
            conflict_rows INTEGER NOT NULL DEFAULT 0,
            imported_at TEXT,
            imported_by TEXT,
            elapsed_ms INTEGER,
            dq_report_json TEXT
        );

        CREATE TABLE IF NOT EXISTS sheet_row (
            batch_id TEXT NOT NULL REFERENCES sheet_batch(batch_id) ON DELETE CASCADE,
            row_number INTEGER NOT NULL,
            row_key TEXT NOT NULL,
            data_json TEXT NOT NULL,
            PRIMARY KEY (batch_id, row_number)
        );

        CREATE INDEX IF NOT EXISTS idx_damage_report_status
            ON damage_report(status);
        CREATE INDEX IF NOT EXISTS idx_sheet_row_key
            ON sheet_row(batch_id, row_key);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}
