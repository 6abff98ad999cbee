// ==========================================
// 仓储作业管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 仓储作业核心层（条码解析 / 破损报告 / 行程单 / 表格导入）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 依赖装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DqLevel, ManifestStatus, ReportStatus, ResolutionSource};

// 领域实体
pub use domain::{
    CatalogEntry, DamageItem, DamageItemField, DamageReport, DamageReportSummary, ManifestItem,
    MaterialMapping, MaterialRecord, SheetBatch, SheetImportOutcome, SheetRow, TripManifest,
};

// 引擎
pub use engine::{extract_material_code, MappingLookup, MaterialCatalog, MaterialResolver};

// API
pub use api::{ImportApi, ManifestApi, MaterialApi, ReportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓储作业管理系统";

// ==========================================
// 预编译检查
// ==========================================
