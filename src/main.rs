// ==========================================
// 仓储作业管理系统 - 主入口
// ==========================================
// 说明: 核心层自检入口（初始化数据库与依赖装配后退出）
// 页面/路由层由外部前端承载，不在本仓库内
// ==========================================

use warehouse_ops::app::{get_default_db_path, AppState};

fn main() {
    // 初始化日志系统
    warehouse_ops::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", warehouse_ops::APP_NAME);
    tracing::info!("系统版本: {}", warehouse_ops::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 创建AppState（打开数据库、建表、装配仓储与API）
    let app_state = AppState::new(db_path).expect("无法初始化AppState");

    tracing::info!(
        "核心服务初始化完成（配置快照: {}）",
        app_state
            .config_manager
            .get_config_snapshot()
            .unwrap_or_else(|_| "{}".to_string())
    );
}
