// ==========================================
// 仓储作业管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod manifest;
pub mod material;
pub mod report;
pub mod sheet;
pub mod types;

// 重导出核心类型
pub use manifest::{ManifestItem, TripManifest};
pub use material::{CatalogEntry, MaterialMapping, MaterialRecord};
pub use report::{DamageItem, DamageItemField, DamageReport, DamageReportSummary};
pub use sheet::{DqReport, DqSummary, DqViolation, SheetBatch, SheetImportOutcome, SheetRow};
pub use types::{DqLevel, ManifestStatus, ReportStatus, ResolutionSource};
