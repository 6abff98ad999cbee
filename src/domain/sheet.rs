// ==========================================
// 仓储作业管理系统 - 表格导入领域模型
// ==========================================
// 用途: 上传表格的批次元信息、行数据与数据质量报告
// 对齐: sheet_batch / sheet_row 表
// ==========================================

use crate::domain::types::DqLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// SheetBatch - 导入批次
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetBatch {
    pub batch_id: String,                   // 批次 ID（UUID）
    pub file_name: Option<String>,          // 源文件名
    pub total_rows: i32,                    // 总行数（数据行）
    pub success_rows: i32,                  // 成功入库行数
    pub blocked_rows: i32,                  // 阻断行数（DQ ERROR）
    pub warning_rows: i32,                  // 警告行数（DQ WARNING）
    pub conflict_rows: i32,                 // 冲突行数（批次内重复键）
    pub imported_at: Option<DateTime<Utc>>, // 导入时间
    pub imported_by: Option<String>,        // 导入人
    pub elapsed_ms: Option<i32>,            // 导入耗时（毫秒）
    pub dq_report_json: Option<String>,     // DQ 报告 JSON
}

// ==========================================
// SheetRow - 批次内单行数据
// ==========================================
// data_json: 列名 → 单元格值 的 JSON 对象，浏览页原样展示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetRow {
    pub batch_id: String,
    pub row_number: i32, // 源文件行号（表头为第 1 行）
    pub row_key: String, // 键列（首列）值
    pub data_json: String,
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: i32,         // 源文件行号
    pub row_key: Option<String>, // 键列值（可解析时）
    pub level: DqLevel,          // 违规级别
    pub field: String,           // 违规字段/列名
    pub message: String,         // 违规描述
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 总数据行数
    pub success: usize,    // 成功入库
    pub blocked: usize,    // 阻断（ERROR）
    pub warning: usize,    // 警告（WARNING）
    pub conflict: usize,   // 冲突（CONFLICT）
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqReport {
    pub batch_id: String,
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

// ==========================================
// SheetImportOutcome - 导入接口返回值
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetImportOutcome {
    pub batch: SheetBatch,
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}
