// ==========================================
// FMCG 采购风险分析 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel 工作簿 (.xlsx/.xls, 多工作表) / CSV 目录 (<工作表名>.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// 原始行: 行号 (含表头,从 2 开始) + 列名 → 值
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize,
    pub values: HashMap<String, String>,
}

// ==========================================
// SheetSource Trait
// ==========================================
// 用途: 按工作表名读取原始行
// 实现者: ExcelParser, CsvDirectoryParser
pub trait SheetSource {
    /// 读取指定工作表
    ///
    /// # 返回
    /// - Ok(Some(rows)): 工作表存在
    /// - Ok(None): 工作表不存在 (由调用方决定是否为错误)
    /// - Err: 文件读取/解析失败
    fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<Option<Vec<RawRow>>>;
}

/// 表头标准化: 去空白、小写、空格/连字符转下划线
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn build_row(headers: &[String], cells: Vec<String>, row_number: usize) -> Option<RawRow> {
    let mut values = HashMap::new();
    for (col_idx, value) in cells.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if header.is_empty() {
                continue;
            }
            values.insert(header.clone(), value.trim().to_string());
        }
    }

    // 跳过完全空白的行
    if values.values().all(|v| v.is_empty()) {
        return None;
    }

    Some(RawRow { row_number, values })
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    path: PathBuf,
}

impl ExcelParser {
    pub fn new<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// 单元格转字符串
    ///
    /// 日期单元格输出 Excel 序列号,由字段映射器统一换算
    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::DateTime(dt) => dt.as_f64().to_string(),
            Data::Empty => String::new(),
            other => other.to_string(),
        }
    }
}

impl SheetSource for ExcelParser {
    fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<Option<Vec<RawRow>>> {
        let mut workbook = open_workbook_auto(&self.path)?;

        // 工作表名大小写不敏感
        let wanted = normalize_header(sheet_name);
        let actual = workbook
            .sheet_names()
            .into_iter()
            .find(|name| normalize_header(name) == wanted);
        let Some(actual) = actual else {
            return Ok(None);
        };

        let range = workbook
            .worksheet_range(&actual)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(Some(Vec::new()));
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| normalize_header(&Self::cell_to_string(cell)))
            .collect();

        // 读取数据行
        let mut records = Vec::new();
        for (idx, data_row) in rows.enumerate() {
            let cells = data_row.iter().map(Self::cell_to_string).collect();
            if let Some(row) = build_row(&headers, cells, idx + 2) {
                records.push(row);
            }
        }

        tracing::debug!(sheet = %actual, rows = records.len(), "Excel 工作表已读取");
        Ok(Some(records))
    }
}

// ==========================================
// CSV 目录 Parser 实现
// ==========================================
// 每个工作表一个文件: <dir>/<Sheet_Name>.csv
pub struct CsvDirectoryParser {
    dir: PathBuf,
}

impl CsvDirectoryParser {
    pub fn new<P: AsRef<Path>>(dir: P) -> ImportResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ImportError::FileNotFound(dir.display().to_string()));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn find_sheet_file(&self, sheet_name: &str) -> ImportResult<Option<PathBuf>> {
        let wanted = normalize_header(sheet_name);
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if !is_csv {
                continue;
            }
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            if normalize_header(stem) == wanted {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

impl SheetSource for CsvDirectoryParser {
    fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<Option<Vec<RawRow>>> {
        let Some(path) = self.find_sheet_file(sheet_name)? else {
            return Ok(None);
        };

        let file = File::open(&path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头 (去除 UTF-8 BOM)
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| normalize_header(h.trim_start_matches('\u{feff}')))
            .collect();

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let cells = record.iter().map(|v| v.to_string()).collect();
            if let Some(row) = build_row(&headers, cells, idx + 2) {
                records.push(row);
            }
        }

        tracing::debug!(file = %path.display(), rows = records.len(), "CSV 工作表已读取");
        Ok(Some(records))
    }
}

// ==========================================
// 通用数据源（根据路径自动选择）
// ==========================================
pub enum UniversalSheetSource {
    Excel(ExcelParser),
    CsvDirectory(CsvDirectoryParser),
}

impl UniversalSheetSource {
    pub fn open<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            return Ok(UniversalSheetSource::CsvDirectory(CsvDirectoryParser::new(path)?));
        }
        Ok(UniversalSheetSource::Excel(ExcelParser::new(path)?))
    }
}

impl SheetSource for UniversalSheetSource {
    fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<Option<Vec<RawRow>>> {
        match self {
            UniversalSheetSource::Excel(p) => p.read_sheet(sheet_name),
            UniversalSheetSource::CsvDirectory(p) => p.read_sheet(sheet_name),
        }
    }
}
