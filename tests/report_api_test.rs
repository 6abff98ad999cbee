// ==========================================
// ReportApi 集成测试
// ==========================================
// 测试范围:
// 1. 报告生命周期: 创建/提交/完结/状态拦截
// 2. 明细编辑: 编号不变式、字段隔离、越界拦截
// 3. 步骤守卫: 录入信息/明细/复核
// ==========================================

mod helpers;

use helpers::api_test_helper::ApiTestEnv;
use helpers::test_data_builder::material_record;
use warehouse_ops::api::ApiError;
use warehouse_ops::domain::report::{DamageItemField, DamageReport};
use warehouse_ops::domain::types::ReportStatus;

fn assert_numbering(report: &DamageReport) {
    for (i, item) in report.items.iter().enumerate() {
        assert_eq!(item.item_number, i as i32 + 1, "编号不变式被破坏");
    }
}

// ==========================================
// 报告生命周期测试
// ==========================================

#[test]
fn test_create_report_草稿状态() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let report = env
        .report_api
        .create_report("张三", "沪A12345", Some("op01".to_string()))
        .expect("创建失败");

    assert_eq!(report.status, ReportStatus::Draft);
    assert!(report.items.is_empty());

    // 读回与持久化一致
    let loaded = env.report_api.get_report(&report.report_id).unwrap();
    assert_eq!(loaded.driver_name, "张三");
    assert_eq!(loaded.plate_number, "沪A12345");
    assert_eq!(loaded.created_by.as_deref(), Some("op01"));
}

#[test]
fn test_get_report_不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let result = env.report_api.get_report("no-such-id");
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[test]
fn test_list_reports_状态过滤() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let draft = env.report_api.create_report("张三", "沪A12345", None).unwrap();
    let to_submit = env.report_api.create_report("李四", "沪B67890", None).unwrap();

    let with_item = env.report_api.add_item(&to_submit.report_id, None).unwrap();
    env.report_api
        .update_item(
            &with_item.report_id,
            0,
            DamageItemField::DamageType,
            "划伤",
        )
        .unwrap();
    env.report_api.submit_report(&to_submit.report_id).unwrap();

    let drafts = env
        .report_api
        .list_reports(Some(ReportStatus::Draft), 100, 0)
        .unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].report_id, draft.report_id);

    let submitted = env
        .report_api
        .list_reports(Some(ReportStatus::Submitted), 100, 0)
        .unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].item_count, 1);

    let all = env.report_api.list_reports(None, 100, 0).unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn test_submit_complete_流转() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("张三", "沪A12345", None).unwrap();

    env.report_api.add_item(&report.report_id, None).unwrap();
    env.report_api
        .update_item(&report.report_id, 0, DamageItemField::DamageType, "压痕")
        .unwrap();

    let submitted = env.report_api.submit_report(&report.report_id).unwrap();
    assert_eq!(submitted.status, ReportStatus::Submitted);

    // 已提交的报告不可再编辑明细
    let result = env.report_api.add_item(&report.report_id, None);
    assert!(matches!(
        result,
        Err(ApiError::InvalidStateTransition { .. })
    ));

    let completed = env.report_api.complete_report(&report.report_id).unwrap();
    assert_eq!(completed.status, ReportStatus::Completed);

    // 已完结的报告不可重复完结
    let result = env.report_api.complete_report(&report.report_id);
    assert!(matches!(
        result,
        Err(ApiError::InvalidStateTransition { .. })
    ));
}

#[test]
fn test_submit_守卫_无明细拦截() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("张三", "沪A12345", None).unwrap();

    let result = env.report_api.submit_report(&report.report_id);
    assert!(matches!(result, Err(ApiError::StepNotReady { .. })));
}

#[test]
fn test_submit_守卫_破损类型为空拦截() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("张三", "沪A12345", None).unwrap();
    env.report_api.add_item(&report.report_id, None).unwrap();

    let result = env.report_api.submit_report(&report.report_id);
    assert!(matches!(result, Err(ApiError::StepNotReady { .. })));
    assert!(!env.report_api.can_review(&report.report_id).unwrap());
}

// ==========================================
// 明细编辑测试
// ==========================================

#[test]
fn test_add_item_编号连续且持久化() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("张三", "沪A12345", None).unwrap();

    for _ in 0..3 {
        env.report_api.add_item(&report.report_id, None).unwrap();
    }

    let loaded = env.report_api.get_report(&report.report_id).unwrap();
    assert_eq!(loaded.items.len(), 3);
    assert_numbering(&loaded);
}

#[test]
fn test_add_item_守卫_司机车牌为空拦截() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("", "", None).unwrap();

    let result = env.report_api.add_item(&report.report_id, None);
    assert!(matches!(result, Err(ApiError::StepNotReady { .. })));
    assert!(!env.report_api.can_enter_items(&report.report_id).unwrap());

    // 补全头信息后放行
    env.report_api
        .update_report_info(&report.report_id, "张三", "沪A12345")
        .unwrap();
    assert!(env.report_api.can_enter_items(&report.report_id).unwrap());
    env.report_api.add_item(&report.report_id, None).unwrap();
    assert!(env
        .report_api
        .can_enter_damage_details(&report.report_id)
        .unwrap());
}

#[test]
fn test_add_item_物料播种() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("张三", "沪A12345", None).unwrap();

    let material = material_record("ABC12345-9001", "ABC12345", "托盘箱");
    let next = env
        .report_api
        .add_item(&report.report_id, Some(&material))
        .unwrap();

    assert_eq!(next.items[0].barcode, "ABC12345-9001");
    assert_eq!(next.items[0].material_code, "ABC12345");
    assert_eq!(next.items[0].material_description, "托盘箱");
    assert!(next.items[0].damage_type.is_empty());
}

#[test]
fn test_update_item_字段隔离() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("张三", "沪A12345", None).unwrap();
    env.report_api.add_item(&report.report_id, None).unwrap();
    env.report_api.add_item(&report.report_id, None).unwrap();

    let before = env.report_api.get_report(&report.report_id).unwrap();
    let after = env
        .report_api
        .update_item(&report.report_id, 1, DamageItemField::DamageType, "凹陷")
        .unwrap();

    assert_eq!(after.items[1].damage_type, "凹陷");
    // 另一条目完全不变，序号不变
    assert_eq!(after.items[0], before.items[0]);
    assert_eq!(after.items[1].item_number, 2);
    assert_eq!(after.items[1].barcode, before.items[1].barcode);
}

#[test]
fn test_update_item_越界拦截() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("张三", "沪A12345", None).unwrap();
    env.report_api.add_item(&report.report_id, None).unwrap();

    let result =
        env.report_api
            .update_item(&report.report_id, 5, DamageItemField::Barcode, "X");
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_remove_item_删除首条重排并持久化() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("张三", "沪A12345", None).unwrap();

    for i in 1..=3 {
        env.report_api.add_item(&report.report_id, None).unwrap();
        env.report_api
            .update_item(
                &report.report_id,
                i - 1,
                DamageItemField::Barcode,
                &format!("B{}", i),
            )
            .unwrap();
    }

    let after = env.report_api.remove_item(&report.report_id, 0).unwrap();
    assert_numbering(&after);

    // 读回校验: 原 2、3 号条目保持相对顺序，序号重排为 1、2
    let loaded = env.report_api.get_report(&report.report_id).unwrap();
    let barcodes: Vec<&str> = loaded.items.iter().map(|i| i.barcode.as_str()).collect();
    assert_eq!(barcodes, vec!["B2", "B3"]);
    let numbers: Vec<i32> = loaded.items.iter().map(|i| i.item_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[test]
fn test_remove_item_越界拦截() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("张三", "沪A12345", None).unwrap();

    let result = env.report_api.remove_item(&report.report_id, 0);
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_增删序列_编号不变式() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env.report_api.create_report("张三", "沪A12345", None).unwrap();

    env.report_api.add_item(&report.report_id, None).unwrap();
    env.report_api.add_item(&report.report_id, None).unwrap();
    env.report_api.add_item(&report.report_id, None).unwrap();
    env.report_api.remove_item(&report.report_id, 1).unwrap();
    env.report_api.add_item(&report.report_id, None).unwrap();
    env.report_api.remove_item(&report.report_id, 0).unwrap();

    let loaded = env.report_api.get_report(&report.report_id).unwrap();
    assert_eq!(loaded.items.len(), 2);
    assert_numbering(&loaded);
}
