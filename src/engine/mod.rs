// ==========================================
// 仓储作业管理系统 - 引擎层
// ==========================================
// 职责: 条码解析兜底链与明细列表业务规则
// 红线: 不含数据访问实现（映射存储经 trait 注入）
// ==========================================

pub mod catalog;
pub mod code_extractor;
pub mod report_items;
pub mod resolver;

// 重导出核心类型
pub use catalog::MaterialCatalog;
pub use code_extractor::extract_material_code;
pub use report_items::{
    add_item, ready_for_damage_details, ready_for_items, ready_for_review, remove_item,
    update_item, ItemListError,
};
pub use resolver::{MappingLookup, MaterialResolver};
