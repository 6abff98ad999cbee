// ==========================================
// 仓储作业管理系统 - 静态物料目录
// ==========================================
// 用途: 本地预置 code → model/category 查询，无 I/O
// 说明: 未命中用显式 Option 表达，不用“返回值等于输入”的哨兵
// ==========================================

use crate::domain::material::CatalogEntry;
use std::collections::HashMap;

// ==========================================
// MaterialCatalog - 静态物料目录
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl MaterialCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 由 (code, model, category) 三元组批量构建
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String)>,
    {
        let mut catalog = Self::new();
        for (code, model, category) in entries {
            catalog.insert(&code, &model, &category);
        }
        catalog
    }

    /// 插入/覆盖一条目录条目
    pub fn insert(&mut self, material_code: &str, model: &str, category: &str) {
        self.entries.insert(
            material_code.trim().to_string(),
            CatalogEntry {
                model: model.trim().to_string(),
                category: category.trim().to_string(),
            },
        );
    }

    /// 按物料码查询
    ///
    /// # 返回
    /// - Some(&CatalogEntry): 命中
    /// - None: 目录中无此码
    pub fn lookup(&self, material_code: &str) -> Option<&CatalogEntry> {
        self.entries.get(material_code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_命中与未命中() {
        let catalog = MaterialCatalog::from_entries(vec![(
            "ABC12345".to_string(),
            "托盘箱 1200x800".to_string(),
            "包装容器".to_string(),
        )]);

        let entry = catalog.lookup("ABC12345").expect("应命中");
        assert_eq!(entry.model, "托盘箱 1200x800");
        assert_eq!(entry.category, "包装容器");

        assert!(catalog.lookup("ZZZ99999").is_none());
    }

    #[test]
    fn test_insert_覆盖同码() {
        let mut catalog = MaterialCatalog::new();
        catalog.insert("ABC12345", "旧型号", "");
        catalog.insert("ABC12345", "新型号", "包装容器");

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("ABC12345").unwrap().model, "新型号");
    }
}
