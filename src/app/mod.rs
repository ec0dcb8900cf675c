// ==========================================
// FMCG 采购风险分析 - 应用层
// ==========================================
// 职责: 一次加载基础表,持有共享 API 实例
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_data_path, AppState};
