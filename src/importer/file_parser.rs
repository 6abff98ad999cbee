// ==========================================
// 仓储作业管理系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 保留表头顺序的行记录（DQ 校验依赖首列为键列）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet_importer::FileParser;
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// ParsedSheet - 解析产物
// ==========================================
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub headers: Vec<String>, // 表头，保留列顺序；首列为键列
    pub rows: Vec<RawSheetRow>,
}

/// 单行原始数据（行号为源文件行号，表头为第 1 行）
#[derive(Debug, Clone)]
pub struct RawSheetRow {
    pub row_number: usize,
    pub cells: HashMap<String, String>, // 列名 → 单元格值
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, file_path: &Path) -> ImportResult<ParsedSheet> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        if let Some(ext) = file_path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyHeader(file_path.display().to_string()));
        }

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut cells = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    cells.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if cells.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawSheetRow {
                row_number: row_idx + 2, // 表头为第 1 行
                cells,
            });
        }

        Ok(ParsedSheet { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse(&self, file_path: &Path) -> ImportResult<ParsedSheet> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext.to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "Excel 文件无工作表".to_string(),
            ));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyHeader(file_path.display().to_string()));
        }

        let mut rows = Vec::new();
        for (row_idx, data_row) in sheet_rows.enumerate() {
            let mut cells = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    cells.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            // 跳过完全空白的行
            if cells.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawSheetRow {
                row_number: row_idx + 2,
                cells,
            });
        }

        Ok(ParsedSheet { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ParsedSheet> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse(path),
            "xlsx" | "xls" => ExcelParser.parse(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
