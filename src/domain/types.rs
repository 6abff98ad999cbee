// ==========================================
// 仓储作业管理系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 报告状态 (Report Status)
// ==========================================
// 流转: DRAFT -> SUBMITTED -> COMPLETED，只进不退
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Draft,     // 草稿（录入中）
    Submitted, // 已提交（待处理）
    Completed, // 已完成（处理闭环）
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Draft => write!(f, "DRAFT"),
            ReportStatus::Submitted => write!(f, "SUBMITTED"),
            ReportStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl ReportStatus {
    /// 从数据库字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(ReportStatus::Draft),
            "SUBMITTED" => Some(ReportStatus::Submitted),
            "COMPLETED" => Some(ReportStatus::Completed),
            _ => None,
        }
    }
}

// ==========================================
// 行程单状态 (Manifest Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManifestStatus {
    Draft,     // 草稿
    Submitted, // 已提交
}

impl fmt::Display for ManifestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestStatus::Draft => write!(f, "DRAFT"),
            ManifestStatus::Submitted => write!(f, "SUBMITTED"),
        }
    }
}

impl ManifestStatus {
    /// 从数据库字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(ManifestStatus::Draft),
            "SUBMITTED" => Some(ManifestStatus::Submitted),
            _ => None,
        }
    }
}

// ==========================================
// 解析来源 (Resolution Source)
// ==========================================
// 记录物料解析命中的兜底层级，用于可解释性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionSource {
    RemoteExact,      // 映射表整码精确命中
    RemotePrefix,     // 映射表前缀码命中
    CatalogExtracted, // 静态目录按提取码命中
    CatalogRaw,       // 静态目录按原始条码命中
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSource::RemoteExact => write!(f, "REMOTE_EXACT"),
            ResolutionSource::RemotePrefix => write!(f, "REMOTE_PREFIX"),
            ResolutionSource::CatalogExtracted => write!(f, "CATALOG_EXTRACTED"),
            ResolutionSource::CatalogRaw => write!(f, "CATALOG_RAW"),
        }
    }
}

// ==========================================
// 数据质量级别 (DQ Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,    // 错误（阻断该行入库）
    Warning,  // 警告（允许入库）
    Conflict, // 冲突（批次内重复键，首行生效）
}

impl fmt::Display for DqLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqLevel::Error => write!(f, "ERROR"),
            DqLevel::Warning => write!(f, "WARNING"),
            DqLevel::Conflict => write!(f, "CONFLICT"),
        }
    }
}
