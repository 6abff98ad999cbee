// ==========================================
// 仓储作业管理系统 - 行程单领域模型
// ==========================================
// 用途: 配送单据清单（一次行程携带的交货单据集合）
// 不变式: 单据行与破损明细同规则，item_number == 下标 + 1
// ==========================================

use crate::domain::types::ManifestStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// ManifestItem - 单据行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestItem {
    pub item_number: i32,    // 1 基序号
    pub document_no: String, // 交货单据号
    pub description: String, // 备注/货物说明
}

// ==========================================
// TripManifest - 行程单聚合根
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripManifest {
    pub manifest_id: String,
    pub driver_name: String,
    pub plate_number: String,
    pub destination: String,
    pub status: ManifestStatus,
    pub items: Vec<ManifestItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TripManifest {
    /// 创建草稿行程单
    pub fn new_draft(driver_name: &str, plate_number: &str, destination: &str) -> Self {
        let now = Utc::now();
        Self {
            manifest_id: Uuid::new_v4().to_string(),
            driver_name: driver_name.trim().to_string(),
            plate_number: plate_number.trim().to_string(),
            destination: destination.trim().to_string(),
            status: ManifestStatus::Draft,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 追加单据行（返回新值，不修改自身）
    pub fn with_document(&self, document_no: &str, description: &str) -> Self {
        let mut next = self.clone();
        next.items.push(ManifestItem {
            item_number: next.items.len() as i32 + 1,
            document_no: document_no.trim().to_string(),
            description: description.trim().to_string(),
        });
        next.updated_at = Utc::now();
        next
    }

    /// 删除指定下标的单据行并整体重排序号（返回新值）
    ///
    /// # 返回
    /// - None: 下标越界
    pub fn without_document(&self, index: usize) -> Option<Self> {
        if index >= self.items.len() {
            return None;
        }
        let mut next = self.clone();
        next.items.remove(index);
        for (pos, item) in next.items.iter_mut().enumerate() {
            item.item_number = pos as i32 + 1;
        }
        next.updated_at = Utc::now();
        Some(next)
    }
}
