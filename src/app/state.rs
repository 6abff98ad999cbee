// ==========================================
// 仓储作业管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 所有依赖由此处显式构造注入，模块内不持有全局客户端
// ==========================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{ImportApi, ManifestApi, MaterialApi, ReportApi};
use crate::config::config_manager::ConfigManager;
use crate::engine::catalog::MaterialCatalog;
use crate::engine::resolver::{MappingLookup, MaterialResolver};
use crate::importer::sheet_importer_impl::SheetImporterImpl;
use crate::repository::{
    manifest_repo::TripManifestRepository, mapping_repo::MaterialMappingRepository,
    report_repo::DamageReportRepository, sheet_repo::SheetRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 物料API
    pub material_api: Arc<MaterialApi>,

    /// 破损报告API
    pub report_api: Arc<ReportApi>,

    /// 行程单API
    pub manifest_api: Arc<ManifestApi>,

    /// 表格导入API
    pub import_api: Arc<ImportApi>,

    /// 条码映射仓储（维护任务用）
    pub mapping_repo: Arc<MaterialMappingRepository>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库连接并初始化 schema（幂等）
    /// 2. 初始化所有Repository
    /// 3. 装载静态物料目录并构造解析器
    /// 4. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::init_schema(&conn).map_err(|e| format!("schema 初始化失败: {}", e))?;
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

        // 装载静态物料目录（预置数据，启动时一次性装入内存）
        let entries = mapping_repo
            .load_catalog_entries()
            .map_err(|e| format!("静态物料目录装载失败: {}", e))?;
        let catalog = Arc::new(MaterialCatalog::from_entries(entries));
        tracing::info!("静态物料目录已装载: {} 条", catalog.len());

        let resolver = Arc::new(MaterialResolver::new(
            mapping_repo.clone() as Arc<dyn MappingLookup>,
            catalog,
            Duration::from_millis(config_manager.remote_timeout_ms()),
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
        let import_api = Arc::new(ImportApi::new(importer, sheet_repo));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            material_api,
            report_api,
            manifest_api,
            import_api,
            mapping_repo,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// # 说明
/// - 优先使用系统数据目录（如 ~/.local/share/warehouse-ops/）
/// - 目录不存在时回落当前目录
pub fn get_default_db_path() -> String {
    if let Some(data_dir) = dirs::data_dir() {
        let app_dir = data_dir.join("warehouse-ops");
        if std::fs::create_dir_all(&app_dir).is_ok() {
            return app_dir.join("warehouse.db").to_string_lossy().to_string();
        }
    }
    "warehouse.db".to_string()
}
