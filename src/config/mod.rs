// ==========================================
// FMCG 采购风险分析 - 配置层
// ==========================================
// 职责: 阈值常量 + 覆写管理
// 存储: 可选 JSON 覆写文件
// ==========================================

pub mod config_manager;
pub mod error;
pub mod thresholds;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use thresholds::RiskThresholds;
