// ==========================================
// 仓储作业管理系统 - 表格导入 API
// ==========================================
// 职责: 表格上传入口与批次浏览
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::sheet::{SheetBatch, SheetImportOutcome, SheetRow};
use crate::importer::sheet_importer::SheetImporter;
use crate::importer::sheet_importer_impl::SheetImporterImpl;
use crate::repository::sheet_repo::SheetRepository;

// ==========================================
// ImportApi - 表格导入 API
// ==========================================

/// 表格导入API
///
/// 职责：
/// 1. 单文件/批量导入入口
/// 2. 批次列表与行数据浏览
pub struct ImportApi {
    importer: Arc<SheetImporterImpl>,
    sheet_repo: Arc<SheetRepository>,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(importer: Arc<SheetImporterImpl>, sheet_repo: Arc<SheetRepository>) -> Self {
        Self {
            importer,
            sheet_repo,
        }
    }

    /// 导入单个表格文件
    pub async fn import_file(
        &self,
        file_path: &str,
        imported_by: Option<String>,
    ) -> ApiResult<SheetImportOutcome> {
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }

        let outcome = self.importer.import_file(file_path, imported_by).await?;
        info!(
            batch_id = %outcome.batch.batch_id,
            success = outcome.summary.success,
            "表格导入入口完成"
        );
        Ok(outcome)
    }

    /// 批量导入多个文件（并发执行，单文件失败不影响其他文件）
    pub async fn batch_import(
        &self,
        file_paths: Vec<String>,
        imported_by: Option<String>,
    ) -> ApiResult<Vec<Result<SheetImportOutcome, String>>> {
        if file_paths.is_empty() {
            return Err(ApiError::InvalidInput("文件列表不能为空".to_string()));
        }

        let paths: Vec<PathBuf> = file_paths.into_iter().map(PathBuf::from).collect();
        Ok(self.importer.batch_import(paths, imported_by).await)
    }

    /// 批次列表（带分页）
    pub fn list_batches(&self, limit: i32, offset: i32) -> ApiResult<Vec<SheetBatch>> {
        if limit <= 0 {
            return Err(ApiError::InvalidInput("limit 必须为正数".to_string()));
        }
        let batches = self.sheet_repo.list_batches(limit, offset.max(0))?;
        Ok(batches)
    }

    /// 按批次 ID 查询批次元信息（含 DQ 报告 JSON）
    pub fn get_batch(&self, batch_id: &str) -> ApiResult<SheetBatch> {
        self.sheet_repo
            .find_batch(batch_id)?
            .ok_or_else(|| ApiError::NotFound(format!("导入批次(id={})不存在", batch_id)))
    }

    /// 浏览批次行数据（带分页）
    pub fn list_rows(&self, batch_id: &str, limit: i32, offset: i32) -> ApiResult<Vec<SheetRow>> {
        if limit <= 0 {
            return Err(ApiError::InvalidInput("limit 必须为正数".to_string()));
        }
        // 批次不存在时给出明确错误，而不是空列表
        if self.sheet_repo.find_batch(batch_id)?.is_none() {
            return Err(ApiError::NotFound(format!("导入批次(id={})不存在", batch_id)));
        }
        let rows = self.sheet_repo.list_rows(batch_id, limit, offset.max(0))?;
        Ok(rows)
    }
}
