// ==========================================
// 仓储作业管理系统 - 破损明细列表管理
// ==========================================
// 不变式: 任意结构变更后 items[i].item_number == i + 1
// 红线: 三个操作都返回新报告值，不就地修改共享状态
// ==========================================

use crate::domain::material::MaterialRecord;
use crate::domain::report::{DamageItem, DamageItemField, DamageReport};
use chrono::Utc;
use thiserror::Error;

/// 明细列表操作错误
///
/// 下标越界属于契约违反（调用方编程错误），显式失败而非静默跳过：
/// 静默跳过会让编号不变式在无人察觉时腐坏
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ItemListError {
    #[error("明细下标越界: index={index}, len={len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// 追加明细条目
///
/// # 参数
/// - material: 已解析的物料（可选）；提供时播种识别字段，否则识别字段留空
///
/// # 返回
/// 带新条目的报告副本；新条目序号为追加时的 len + 1（即恒为末位）
pub fn add_item(report: &DamageReport, material: Option<&MaterialRecord>) -> DamageReport {
    let mut next = report.clone();
    let item_number = next.items.len() as i32 + 1;
    let item = match material {
        Some(m) => DamageItem::from_material(item_number, m),
        None => DamageItem::blank(item_number),
    };
    next.items.push(item);
    next.updated_at = Utc::now();
    next
}

/// 替换指定下标条目的单个字段
///
/// # 说明
/// - 仅按值替换一个字段，不触碰 item_number 与其余字段
/// - PhotoUrl: 空白值表示清除照片引用
///
/// # 错误
/// - IndexOutOfRange: 下标越界（契约违反）
pub fn update_item(
    report: &DamageReport,
    index: usize,
    field: DamageItemField,
    value: &str,
) -> Result<DamageReport, ItemListError> {
    if index >= report.items.len() {
        return Err(ItemListError::IndexOutOfRange {
            index,
            len: report.items.len(),
        });
    }

    let mut next = report.clone();
    let item = &mut next.items[index];
    match field {
        DamageItemField::Barcode => item.barcode = value.to_string(),
        DamageItemField::MaterialCode => item.material_code = value.to_string(),
        DamageItemField::MaterialDescription => item.material_description = value.to_string(),
        DamageItemField::DamageType => item.damage_type = value.to_string(),
        DamageItemField::DamageDescription => item.damage_description = value.to_string(),
        DamageItemField::PhotoUrl => {
            item.photo_url = if value.trim().is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
    }
    next.updated_at = Utc::now();
    Ok(next)
}

/// 删除指定下标条目并整体重排序号
///
/// # 说明
/// 重排是全量重算（position + 1），不是对后续条目做减一：
/// 即使入参编号已腐坏，删除后也会恢复不变式
///
/// # 错误
/// - IndexOutOfRange: 下标越界（契约违反）
pub fn remove_item(report: &DamageReport, index: usize) -> Result<DamageReport, ItemListError> {
    if index >= report.items.len() {
        return Err(ItemListError::IndexOutOfRange {
            index,
            len: report.items.len(),
        });
    }

    let mut next = report.clone();
    next.items.remove(index);
    renumber(&mut next.items);
    next.updated_at = Utc::now();
    Ok(next)
}

/// 全量重排序号: items[i].item_number = i + 1
fn renumber(items: &mut [DamageItem]) {
    for (pos, item) in items.iter_mut().enumerate() {
        item.item_number = pos as i32 + 1;
    }
}

// ==========================================
// 步骤守卫（纯谓词，无副作用）
// ==========================================

/// 可进入明细录入步骤: 司机姓名与车牌号均非空
pub fn ready_for_items(report: &DamageReport) -> bool {
    !report.driver_name.trim().is_empty() && !report.plate_number.trim().is_empty()
}

/// 可进入破损详情步骤: 至少存在一条明细
pub fn ready_for_damage_details(report: &DamageReport) -> bool {
    !report.items.is_empty()
}

/// 可进入复核/提交步骤: 每条明细的破损类型均非空
pub fn ready_for_review(report: &DamageReport) -> bool {
    !report.items.is_empty()
        && report
            .items
            .iter()
            .all(|item| !item.damage_type.trim().is_empty())
}
