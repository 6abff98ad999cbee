// ==========================================
// 仓储作业管理系统 - 破损报告领域模型
// ==========================================
// 红线: items 顺序即展示与编号顺序
// 不变式: 任意结构变更后 items[i].item_number == i + 1
// ==========================================

use crate::domain::material::MaterialRecord;
use crate::domain::types::ReportStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// DamageItem - 破损明细条目
// ==========================================
// 归属: 由唯一一份 DamageReport 独占持有，不跨报告共享
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageItem {
    pub item_number: i32,             // 1 基序号，恒等于列表下标 + 1
    pub barcode: String,              // 扫描条码（可为空，手工录入场景）
    pub material_code: String,        // 物料码
    pub material_description: String, // 物料描述
    pub damage_type: String,          // 破损类型（提交前必填）
    pub damage_description: String,   // 破损描述
    pub photo_url: Option<String>,    // 外部存储的照片引用，缺省合法
}

impl DamageItem {
    /// 构造空白条目（仅序号确定，识别字段留空）
    pub fn blank(item_number: i32) -> Self {
        Self {
            item_number,
            barcode: String::new(),
            material_code: String::new(),
            material_description: String::new(),
            damage_type: String::new(),
            damage_description: String::new(),
            photo_url: None,
        }
    }

    /// 由物料解析结果播种识别字段
    pub fn from_material(item_number: i32, material: &MaterialRecord) -> Self {
        Self {
            item_number,
            barcode: material.barcode.clone(),
            material_code: material.material_code.clone(),
            material_description: material.material_description.clone(),
            damage_type: String::new(),
            damage_description: String::new(),
            photo_url: None,
        }
    }
}

// ==========================================
// DamageItemField - 条目可更新字段
// ==========================================
// item_number 不在其中: 序号只能由列表结构变更重算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageItemField {
    Barcode,
    MaterialCode,
    MaterialDescription,
    DamageType,
    DamageDescription,
    PhotoUrl,
}

// ==========================================
// DamageReport - 破损报告聚合根
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub report_id: String,          // UUID
    pub driver_name: String,        // 司机姓名
    pub plate_number: String,       // 车牌号
    pub status: ReportStatus,       // DRAFT / SUBMITTED / COMPLETED
    pub items: Vec<DamageItem>,     // 有序明细（顺序有业务含义）
    pub created_by: Option<String>, // 创建人
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DamageReport {
    /// 创建草稿报告（司机/车牌允许为空，进入明细步骤前由守卫拦截）
    pub fn new_draft(driver_name: &str, plate_number: &str, created_by: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            report_id: Uuid::new_v4().to_string(),
            driver_name: driver_name.trim().to_string(),
            plate_number: plate_number.trim().to_string(),
            status: ReportStatus::Draft,
            items: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// DamageReportSummary - 列表页摘要
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageReportSummary {
    pub report_id: String,
    pub driver_name: String,
    pub plate_number: String,
    pub status: ReportStatus,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}
