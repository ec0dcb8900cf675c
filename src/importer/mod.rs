// ==========================================
// FMCG 采购风险分析 - 导入层
// ==========================================
// 职责: 外部数据导入,生成只读基础表
// 支持: Excel 工作簿, CSV 目录
// ==========================================

// 模块声明
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod workbook_loader;

// 重导出核心类型
pub use dq_validator::{DqLevel, DqValidator, DqViolation};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{parse_date_value, FieldMapper};
pub use file_parser::{CsvDirectoryParser, ExcelParser, RawRow, SheetSource, UniversalSheetSource};
pub use workbook_loader::{LoadReport, WorkbookLoader};
