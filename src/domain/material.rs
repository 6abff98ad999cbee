// ==========================================
// 仓储作业管理系统 - 物料领域模型
// ==========================================
// 用途: 条码解析链路的输入输出结构
// 红线: MaterialRecord 解析后不可变，按次构造
// ==========================================

use crate::domain::types::ResolutionSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// MaterialRecord - 物料解析结果
// ==========================================
// 生命周期: 每次解析调用临时构造，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub barcode: String,              // 原始扫描条码（保留原样，不做破坏性归一）
    pub material_code: String,        // 归一化物料码（大写字母数字，前缀提取时 8-12 位）
    pub material_description: String, // 展示用物料描述
    pub category: String,             // 自由文本分类标签
    pub source: ResolutionSource,     // 命中的兜底层级
}

// ==========================================
// MaterialMapping - 条码映射表行
// ==========================================
// 对齐: material_mapping 表，键为 barcode，至多一行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialMapping {
    pub barcode: String,
    pub material_code: String,
    pub material_description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaterialMapping {
    /// 转换为解析结果（映射行字段原样带出）
    pub fn into_record(self, source: ResolutionSource) -> MaterialRecord {
        MaterialRecord {
            barcode: self.barcode,
            material_code: self.material_code,
            material_description: self.material_description,
            category: self.category,
            source,
        }
    }
}

// ==========================================
// CatalogEntry - 静态目录条目
// ==========================================
// 用途: 本地预置 code → model/category 表，无 I/O
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub model: String,    // 型号/描述
    pub category: String, // 分类
}
