// ==========================================
// FMCG 采购风险分析 - API 层
// ==========================================
// 职责: 对外提供按筛选范围的页面报表接口
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{FullReport, RiskDashboardApi};
pub use error::{ApiError, ApiResult};
