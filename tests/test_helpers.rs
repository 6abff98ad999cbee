// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化功能
// ==========================================

use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    warehouse_ops::db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}
