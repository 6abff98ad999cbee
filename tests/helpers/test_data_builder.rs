// ==========================================
// 测试数据构建器
// ==========================================
// 职责: 以流式接口构建测试用领域对象
// ==========================================

use chrono::Utc;
use warehouse_ops::domain::material::{MaterialMapping, MaterialRecord};
use warehouse_ops::domain::types::ResolutionSource;

// ==========================================
// MappingBuilder - 条码映射构建器
// ==========================================
pub struct MappingBuilder {
    barcode: String,
    material_code: String,
    material_description: String,
    category: String,
}

impl MappingBuilder {
    pub fn new(barcode: &str) -> Self {
        Self {
            barcode: barcode.to_string(),
            material_code: barcode.to_string(),
            material_description: format!("{} 描述", barcode),
            category: String::new(),
        }
    }

    pub fn code(mut self, code: &str) -> Self {
        self.material_code = code.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.material_description = description.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn build(self) -> MaterialMapping {
        let now = Utc::now();
        MaterialMapping {
            barcode: self.barcode,
            material_code: self.material_code,
            material_description: self.material_description,
            category: self.category,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 构建解析结果（用于明细播种测试）
pub fn material_record(barcode: &str, code: &str, description: &str) -> MaterialRecord {
    MaterialRecord {
        barcode: barcode.to_string(),
        material_code: code.to_string(),
        material_description: description.to_string(),
        category: String::new(),
        source: ResolutionSource::RemoteExact,
    }
}
