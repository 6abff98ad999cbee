// ==========================================
// 仓储作业管理系统 - 表格导入 Trait
// ==========================================
// 职责: 定义表格导入接口（不包含实现）
// ==========================================

use crate::domain::sheet::SheetImportOutcome;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::ParsedSheet;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

// ==========================================
// SheetImporter Trait
// ==========================================
// 用途: 表格导入主接口
// 实现者: SheetImporterImpl
#[async_trait]
pub trait SheetImporter: Send + Sync {
    /// 导入单个表格文件
    ///
    /// # 参数
    /// - file_path: 文件路径（.xlsx/.xls/.csv）
    /// - imported_by: 导入人（可选）
    ///
    /// # 返回
    /// - Ok(SheetImportOutcome): 批次信息 + DQ 报告 + 汇总统计
    /// - Err: 文件读取错误、行数超限、数据库错误
    ///
    /// # 导入流程
    /// 1. 文件读取与解析（首行表头，首列为键列）
    /// 2. 数据质量校验（键列空值阻断、批次内重复键冲突、短行警告）
    /// 3. 落库（批次 + 行数据，事务化）+ DQ 报告生成
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        imported_by: Option<String>,
    ) -> ImportResult<SheetImportOutcome>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，互不影响
    /// - 单个文件失败不影响其他文件，失败以 Err(String) 占位返回
    async fn batch_import(
        &self,
        file_paths: Vec<PathBuf>,
        imported_by: Option<String>,
    ) -> Vec<Result<SheetImportOutcome, String>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为表头 + 原始行记录
    fn parse(&self, file_path: &Path) -> ImportResult<ParsedSheet>;
}
