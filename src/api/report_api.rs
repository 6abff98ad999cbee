// ==========================================
// 仓储作业管理系统 - 破损报告 API
// ==========================================
// 职责: 报告生命周期管理、明细编辑、步骤守卫与提交
// 红线: 编号不变式由引擎层维护，API 层只做输入校验与状态流转
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::material::MaterialRecord;
use crate::domain::report::{DamageItemField, DamageReport, DamageReportSummary};
use crate::domain::types::ReportStatus;
use crate::engine::report_items;
use crate::repository::report_repo::DamageReportRepository;

// ==========================================
// ReportApi - 破损报告 API
// ==========================================

/// 破损报告API
///
/// 职责：
/// 1. 报告创建/查询/列表
/// 2. 明细增改删（委托引擎层，保持编号不变式）
/// 3. 步骤守卫检查与提交/完结流转
pub struct ReportApi {
    report_repo: Arc<DamageReportRepository>,
}

impl ReportApi {
    /// 创建新的ReportApi实例
    pub fn new(report_repo: Arc<DamageReportRepository>) -> Self {
        Self { report_repo }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 按 ID 查询完整报告
    pub fn get_report(&self, report_id: &str) -> ApiResult<DamageReport> {
        self.load(report_id)
    }

    /// 列表查询（可选状态过滤，带分页）
    pub fn list_reports(
        &self,
        status: Option<ReportStatus>,
        limit: i32,
        offset: i32,
    ) -> ApiResult<Vec<DamageReportSummary>> {
        if limit <= 0 {
            return Err(ApiError::InvalidInput("limit 必须为正数".to_string()));
        }
        let summaries = self
            .report_repo
            .list_summaries(status, limit, offset.max(0))?;
        Ok(summaries)
    }

    // ==========================================
    // 报告生命周期
    // ==========================================

    /// 创建草稿报告
    ///
    /// # 说明
    /// 司机/车牌允许为空：向导第一步可以先建草稿再补信息，
    /// 进入明细步骤前由守卫拦截
    pub fn create_report(
        &self,
        driver_name: &str,
        plate_number: &str,
        created_by: Option<String>,
    ) -> ApiResult<DamageReport> {
        let report = DamageReport::new_draft(driver_name, plate_number, created_by);
        self.report_repo.save(&report)?;
        info!(report_id = %report.report_id, "创建破损报告草稿");
        Ok(report)
    }

    /// 更新报告头信息（司机/车牌）
    pub fn update_report_info(
        &self,
        report_id: &str,
        driver_name: &str,
        plate_number: &str,
    ) -> ApiResult<DamageReport> {
        let mut report = self.load(report_id)?;
        self.ensure_draft(&report)?;

        report.driver_name = driver_name.trim().to_string();
        report.plate_number = plate_number.trim().to_string();
        report.updated_at = chrono::Utc::now();
        self.report_repo.save(&report)?;
        Ok(report)
    }

    /// 提交报告（DRAFT -> SUBMITTED）
    ///
    /// # 守卫
    /// - 至少一条明细
    /// - 每条明细的破损类型均非空
    pub fn submit_report(&self, report_id: &str) -> ApiResult<DamageReport> {
        let mut report = self.load(report_id)?;
        self.ensure_draft(&report)?;

        if !report_items::ready_for_damage_details(&report) {
            return Err(ApiError::StepNotReady {
                reason: "报告没有任何明细条目".to_string(),
            });
        }
        if !report_items::ready_for_review(&report) {
            return Err(ApiError::StepNotReady {
                reason: "存在破损类型为空的明细条目".to_string(),
            });
        }

        report.status = ReportStatus::Submitted;
        report.updated_at = chrono::Utc::now();
        self.report_repo.save(&report)?;
        info!(report_id = %report.report_id, "破损报告已提交");
        Ok(report)
    }

    /// 完结报告（SUBMITTED -> COMPLETED）
    pub fn complete_report(&self, report_id: &str) -> ApiResult<DamageReport> {
        let mut report = self.load(report_id)?;
        if report.status != ReportStatus::Submitted {
            return Err(ApiError::InvalidStateTransition {
                from: report.status.to_string(),
                to: ReportStatus::Completed.to_string(),
            });
        }

        report.status = ReportStatus::Completed;
        report.updated_at = chrono::Utc::now();
        self.report_repo.save(&report)?;
        info!(report_id = %report.report_id, "破损报告已完结");
        Ok(report)
    }

    // ==========================================
    // 明细编辑（委托引擎层）
    // ==========================================

    /// 追加明细条目
    ///
    /// # 参数
    /// - material: 已解析的物料（可选），提供时播种识别字段
    ///
    /// # 守卫
    /// 司机姓名与车牌号均非空后才允许录入明细
    pub fn add_item(
        &self,
        report_id: &str,
        material: Option<&MaterialRecord>,
    ) -> ApiResult<DamageReport> {
        let report = self.load(report_id)?;
        self.ensure_draft(&report)?;

        if !report_items::ready_for_items(&report) {
            return Err(ApiError::StepNotReady {
                reason: "司机姓名或车牌号为空，不能录入明细".to_string(),
            });
        }

        let next = report_items::add_item(&report, material);
        self.report_repo.save(&next)?;
        debug!(report_id, items = next.items.len(), "追加破损明细");
        Ok(next)
    }

    /// 更新明细条目的单个字段
    pub fn update_item(
        &self,
        report_id: &str,
        index: usize,
        field: DamageItemField,
        value: &str,
    ) -> ApiResult<DamageReport> {
        let report = self.load(report_id)?;
        self.ensure_draft(&report)?;

        let next = report_items::update_item(&report, index, field, value)?;
        self.report_repo.save(&next)?;
        Ok(next)
    }

    /// 删除明细条目（删除后整体重排序号）
    pub fn remove_item(&self, report_id: &str, index: usize) -> ApiResult<DamageReport> {
        let report = self.load(report_id)?;
        self.ensure_draft(&report)?;

        let next = report_items::remove_item(&report, index)?;
        self.report_repo.save(&next)?;
        debug!(report_id, items = next.items.len(), "删除破损明细");
        Ok(next)
    }

    // ==========================================
    // 步骤守卫查询（向导页用）
    // ==========================================

    /// 是否可进入明细录入步骤
    pub fn can_enter_items(&self, report_id: &str) -> ApiResult<bool> {
        Ok(report_items::ready_for_items(&self.load(report_id)?))
    }

    /// 是否可进入破损详情步骤
    pub fn can_enter_damage_details(&self, report_id: &str) -> ApiResult<bool> {
        Ok(report_items::ready_for_damage_details(&self.load(report_id)?))
    }

    /// 是否可进入复核/提交步骤
    pub fn can_review(&self, report_id: &str) -> ApiResult<bool> {
        Ok(report_items::ready_for_review(&self.load(report_id)?))
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn load(&self, report_id: &str) -> ApiResult<DamageReport> {
        self.report_repo
            .find_by_id(report_id)?
            .ok_or_else(|| ApiError::NotFound(format!("破损报告(id={})不存在", report_id)))
    }

    /// 只有草稿可编辑
    fn ensure_draft(&self, report: &DamageReport) -> ApiResult<()> {
        if report.status != ReportStatus::Draft {
            return Err(ApiError::InvalidStateTransition {
                from: report.status.to_string(),
                to: ReportStatus::Draft.to_string(),
            });
        }
        Ok(())
    }
}
