// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::NamedTempFile;

use rusqlite::Connection;
use warehouse_ops::api::{ImportApi, ManifestApi, MaterialApi, ReportApi};
use warehouse_ops::config::config_manager::ConfigManager;
use warehouse_ops::engine::catalog::MaterialCatalog;
use warehouse_ops::engine::resolver::{MappingLookup, MaterialResolver};
use warehouse_ops::importer::sheet_importer_impl::SheetImporterImpl;
use warehouse_ops::repository::{
    manifest_repo::TripManifestRepository, mapping_repo::MaterialMappingRepository,
    report_repo::DamageReportRepository, sheet_repo::SheetRepository,
};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖
pub struct ApiTestEnv {
    pub db_path: String,
    pub material_api: Arc<MaterialApi>,
    pub report_api: Arc<ReportApi>,
    pub manifest_api: Arc<ManifestApi>,
    pub import_api: Arc<ImportApi>,

    // Repository层（用于测试数据准备）
    pub mapping_repo: Arc<MaterialMappingRepository>,
    pub sheet_repo: Arc<SheetRepository>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境（静态目录为空）
    pub fn new() -> Result<Self, String> {
        Self::with_catalog(vec![])
    }

    /// 创建带预置静态目录的API测试环境
    ///
    /// # 参数
    /// - catalog_entries: (material_code, model, category) 三元组
    ///
    /// # 说明
    /// - 使用临时数据库文件，自动初始化 schema
    /// - 目录条目先落表再装入内存（与生产启动路径一致）
    pub fn with_catalog(catalog_entries: Vec<(&str, &str, &str)>) -> Result<Self, String> {
        let (temp_file, db_path) =
            test_helpers::create_test_db().map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let conn = Connection::open(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================

        let mapping_repo = Arc::new(MaterialMappingRepository::from_connection(conn.clone()));
        let report_repo = Arc::new(DamageReportRepository::from_connection(conn.clone()));
        let manifest_repo = Arc::new(TripManifestRepository::from_connection(conn.clone()));
        let sheet_repo = Arc::new(SheetRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化Engine层
        // ==========================================

        for (code, model, category) in &catalog_entries {
            mapping_repo
                .upsert_catalog_entry(code, model, category)
                .map_err(|e| format!("目录预置失败: {}", e))?;
        }

        let entries = mapping_repo
            .load_catalog_entries()
            .map_err(|e| format!("目录装载失败: {}", e))?;
        let catalog = Arc::new(MaterialCatalog::from_entries(entries));

        let resolver = Arc::new(MaterialResolver::new(
            mapping_repo.clone() as Arc<dyn MappingLookup>,
            catalog,
            Duration::from_millis(500),
        ));

        let importer = Arc::new(SheetImporterImpl::new(
            sheet_repo.clone(),
            config_manager.clone(),
        ));

        // ==========================================
        // 创建API实例
        // ==========================================

        let material_api = Arc::new(MaterialApi::new(mapping_repo.clone(), resolver));
        let report_api = Arc::new(ReportApi::new(report_repo));
        let manifest_api = Arc::new(ManifestApi::new(manifest_repo));
        let import_api = Arc::new(ImportApi::new(importer, sheet_repo.clone()));

        Ok(Self {
            db_path,
            material_api,
            report_api,
            manifest_api,
            import_api,
            mapping_repo,
            sheet_repo,
            _temp_file: temp_file,
        })
    }
}
