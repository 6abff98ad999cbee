// ==========================================
// ImportApi 集成测试
// ==========================================
// 测试范围:
// 1. CSV 导入: DQ 规则（键列空值/重复键/短行）、批次落库
// 2. 批次浏览: 列表、行数据分页、DQ 报告
// 3. 批量导入: 并发执行、单文件失败隔离
// ==========================================

mod helpers;

use helpers::api_test_helper::ApiTestEnv;
use std::io::Write;
use warehouse_ops::api::ApiError;
use warehouse_ops::domain::types::DqLevel;

/// 写一个带 DQ 问题的测试 CSV:
/// - 第 2 行正常
/// - 第 3 行键列为空（ERROR 阻断）
/// - 第 4 行与第 2 行重复键（CONFLICT，首行生效）
/// - 第 5 行列数不足（WARNING，仍入库）
fn write_test_csv() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "单据号,品名,数量").unwrap();
    writeln!(file, "DN-001,托盘,2").unwrap();
    writeln!(file, ",料箱,1").unwrap();
    writeln!(file, "DN-001,托盘,3").unwrap();
    writeln!(file, "DN-002,周转笼").unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_import_file_dq规则与汇总() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let file = write_test_csv();

    let outcome = env
        .import_api
        .import_file(file.path().to_str().unwrap(), Some("op01".to_string()))
        .await
        .expect("导入失败");

    assert_eq!(outcome.summary.total_rows, 4);
    assert_eq!(outcome.summary.success, 2, "正常行 + 短行入库");
    assert_eq!(outcome.summary.blocked, 1, "键列空值阻断");
    assert_eq!(outcome.summary.conflict, 1, "重复键冲突");
    assert_eq!(outcome.summary.warning, 1, "短行警告");

    // 违规明细按级别可区分
    assert!(outcome
        .violations
        .iter()
        .any(|v| v.level == DqLevel::Error && v.row_number == 3));
    assert!(outcome
        .violations
        .iter()
        .any(|v| v.level == DqLevel::Conflict && v.row_key.as_deref() == Some("DN-001")));
    assert!(outcome
        .violations
        .iter()
        .any(|v| v.level == DqLevel::Warning && v.row_number == 5));

    assert_eq!(outcome.batch.imported_by.as_deref(), Some("op01"));
}

#[tokio::test]
async fn test_import_file_批次与行数据落库() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let file = write_test_csv();

    let outcome = env
        .import_api
        .import_file(file.path().to_str().unwrap(), None)
        .await
        .unwrap();
    let batch_id = outcome.batch.batch_id.clone();

    // 批次元信息可读回，DQ 报告 JSON 已存储
    let batch = env.import_api.get_batch(&batch_id).unwrap();
    assert_eq!(batch.success_rows, 2);
    let dq_json = batch.dq_report_json.expect("应存储 DQ 报告");
    assert!(dq_json.contains("批次内重复键"));

    // 行数据按行号升序，冲突行未入库（首行生效）
    let rows = env.import_api.list_rows(&batch_id, 100, 0).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row_key, "DN-001");
    assert_eq!(rows[0].row_number, 2);
    assert_eq!(rows[1].row_key, "DN-002");
    assert!(rows[0].data_json.contains("托盘"));

    // 行数据分页
    let page = env.import_api.list_rows(&batch_id, 1, 1).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].row_key, "DN-002");
}

#[tokio::test]
async fn test_list_batches_倒序() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let f1 = write_test_csv();
    let f2 = write_test_csv();
    env.import_api
        .import_file(f1.path().to_str().unwrap(), None)
        .await
        .unwrap();
    env.import_api
        .import_file(f2.path().to_str().unwrap(), None)
        .await
        .unwrap();

    let batches = env.import_api.list_batches(10, 0).unwrap();
    assert_eq!(batches.len(), 2);
}

#[tokio::test]
async fn test_browse_不存在的批次() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.import_api.get_batch("no-such-batch");
    assert!(matches!(result, Err(ApiError::NotFound(_))));

    let result = env.import_api.list_rows("no-such-batch", 10, 0);
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_import_file_不存在的文件() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env
        .import_api
        .import_file("/nonexistent/data.csv", None)
        .await;
    assert!(matches!(result, Err(ApiError::ImportFailed(_))));
}

#[tokio::test]
async fn test_batch_import_单文件失败隔离() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let good = write_test_csv();

    let results = env
        .import_api
        .batch_import(
            vec![
                good.path().to_str().unwrap().to_string(),
                "/nonexistent/bad.csv".to_string(),
            ],
            None,
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok(), "正常文件不受失败文件影响");
    let err = results[1].as_ref().unwrap_err();
    assert!(err.contains("bad.csv"));

    // 成功的那个批次已落库
    let batches = env.import_api.list_batches(10, 0).unwrap();
    assert_eq!(batches.len(), 1);
}
