// ==========================================
// 仓储作业管理系统 - 表格导入实现
// ==========================================
// 流程: 解析 -> DQ 校验 -> 事务落库 -> DQ 报告
// 红线: 阻断行与冲突行不入库；冲突行首行生效
// ==========================================

use crate::config::config_manager::ConfigManager;
use crate::domain::sheet::{
    DqReport, DqSummary, DqViolation, SheetBatch, SheetImportOutcome, SheetRow,
};
use crate::domain::types::DqLevel;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{ParsedSheet, UniversalFileParser};
use crate::importer::sheet_importer::SheetImporter;
use crate::repository::sheet_repo::SheetRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

// ==========================================
// SheetImporterImpl - 表格导入实现
// ==========================================
pub struct SheetImporterImpl {
    sheet_repo: Arc<SheetRepository>,
    config: Arc<ConfigManager>,
}

impl SheetImporterImpl {
    pub fn new(sheet_repo: Arc<SheetRepository>, config: Arc<ConfigManager>) -> Self {
        Self { sheet_repo, config }
    }

    /// DQ 校验 + 行数据构建
    ///
    /// # 规则
    /// - 键列（首列）为空 → ERROR，该行阻断
    /// - 批次内重复键 → CONFLICT，首行生效，后续行不入库
    /// - 单元格数少于表头列数 → WARNING，仍入库
    fn validate_and_build(
        &self,
        batch_id: &str,
        sheet: &ParsedSheet,
    ) -> ImportResult<(Vec<SheetRow>, Vec<DqViolation>)> {
        let key_column = sheet
            .headers
            .first()
            .cloned()
            .ok_or_else(|| ImportError::EmptyHeader("表头缺失".to_string()))?;

        let mut rows = Vec::with_capacity(sheet.rows.len());
        let mut violations = Vec::new();
        let mut seen_keys: HashSet<String> = HashSet::new();

        for raw in &sheet.rows {
            let key = raw
                .cells
                .get(&key_column)
                .map(|v| v.trim().to_string())
                .unwrap_or_default();

            if key.is_empty() {
                violations.push(DqViolation {
                    row_number: raw.row_number as i32,
                    row_key: None,
                    level: DqLevel::Error,
                    field: key_column.clone(),
                    message: "键列为空，该行阻断".to_string(),
                });
                continue;
            }

            if !seen_keys.insert(key.clone()) {
                violations.push(DqViolation {
                    row_number: raw.row_number as i32,
                    row_key: Some(key.clone()),
                    level: DqLevel::Conflict,
                    field: key_column.clone(),
                    message: format!("批次内重复键 {}，首行生效", key),
                });
                continue;
            }

            if raw.cells.len() < sheet.headers.len() {
                violations.push(DqViolation {
                    row_number: raw.row_number as i32,
                    row_key: Some(key.clone()),
                    level: DqLevel::Warning,
                    field: String::new(),
                    message: format!(
                        "单元格数 {} 少于表头列数 {}",
                        raw.cells.len(),
                        sheet.headers.len()
                    ),
                });
            }

            let data_json = serde_json::to_string(&raw.cells)
                .map_err(|e| ImportError::InternalError(e.to_string()))?;

            rows.push(SheetRow {
                batch_id: batch_id.to_string(),
                row_number: raw.row_number as i32,
                row_key: key,
                data_json,
            });
        }

        Ok((rows, violations))
    }

    fn summarize(total: usize, stored: usize, violations: &[DqViolation]) -> DqSummary {
        DqSummary {
            total_rows: total,
            success: stored,
            blocked: violations
                .iter()
                .filter(|v| v.level == DqLevel::Error)
                .count(),
            warning: violations
                .iter()
                .filter(|v| v.level == DqLevel::Warning)
                .count(),
            conflict: violations
                .iter()
                .filter(|v| v.level == DqLevel::Conflict)
                .count(),
        }
    }
}

#[async_trait]
impl SheetImporter for SheetImporterImpl {
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        imported_by: Option<String>,
    ) -> ImportResult<SheetImportOutcome> {
        let path = file_path.as_ref();
        let started = Instant::now();
        let batch_id = Uuid::new_v4().to_string();

        info!(batch_id = %batch_id, path = %path.display(), "开始导入表格");

        // 1) 解析
        let sheet = UniversalFileParser.parse(path)?;

        let max_rows = self.config.import_max_rows();
        if sheet.rows.len() > max_rows {
            return Err(ImportError::TooManyRows {
                count: sheet.rows.len(),
                max: max_rows,
            });
        }

        // 2) DQ 校验
        let (rows, violations) = self.validate_and_build(&batch_id, &sheet)?;
        let summary = Self::summarize(sheet.rows.len(), rows.len(), &violations);

        // 3) 落库
        let report = DqReport {
            batch_id: batch_id.clone(),
            summary: summary.clone(),
            violations: violations.clone(),
        };
        let dq_report_json = serde_json::to_string(&report)
            .map_err(|e| ImportError::InternalError(e.to_string()))?;

        let batch = SheetBatch {
            batch_id,
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            total_rows: sheet.rows.len() as i32,
            success_rows: rows.len() as i32,
            blocked_rows: summary.blocked as i32,
            warning_rows: summary.warning as i32,
            conflict_rows: summary.conflict as i32,
            imported_at: Some(Utc::now()),
            imported_by,
            elapsed_ms: Some(started.elapsed().as_millis() as i32),
            dq_report_json: Some(dq_report_json),
        };

        self.sheet_repo.insert_batch(&batch, &rows)?;

        info!(
            batch_id = %batch.batch_id,
            total = summary.total_rows,
            success = summary.success,
            blocked = summary.blocked,
            conflict = summary.conflict,
            "表格导入完成"
        );

        Ok(SheetImportOutcome {
            batch,
            summary,
            violations,
        })
    }

    async fn batch_import(
        &self,
        file_paths: Vec<PathBuf>,
        imported_by: Option<String>,
    ) -> Vec<Result<SheetImportOutcome, String>> {
        let futures = file_paths.into_iter().map(|path| {
            let by = imported_by.clone();
            async move {
                self.import_file(&path, by).await.map_err(|e| {
                    warn!(path = %path.display(), error = %e, "批量导入中单个文件失败");
                    format!("{}: {}", path.display(), e)
                })
            }
        });

        futures::future::join_all(futures).await
    }
}
