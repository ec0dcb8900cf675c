// ==========================================
// FMCG 采购风险分析 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 只有"读不进来"才是错误; 数据质量问题走 DQ 报告
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls 或 CSV 目录）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 工作表错误 =====
    #[error("缺少必需工作表: {0}")]
    SheetNotFound(String),

    #[error("工作表 {sheet} 缺少必需列: {column}")]
    MissingColumn { sheet: String, column: String },

    // ===== 数据映射错误 =====
    #[error("必填字段为空 ({sheet} 行 {row}, 字段 {field})")]
    RequiredFieldMissing {
        sheet: String,
        row: usize,
        field: String,
    },

    #[error("类型转换失败 ({sheet} 行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        sheet: String,
        row: usize,
        field: String,
        message: String,
    },

    #[error("日期格式错误 ({sheet} 行 {row}, 字段 {field}): 无法识别 {value}")]
    DateFormatError {
        sheet: String,
        row: usize,
        field: String,
        value: String,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
