// ==========================================
// FMCG 采购风险分析 - 核心库
// ==========================================
// 系统定位: 采购风险决策支持 (评分 + 规则洞察,不做自动下单)
// 数据流: 工作簿导入 → 筛选范围 → 各分析器 → 洞察与建议动作
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与类型
pub mod domain;

// 导入层 - 工作簿/CSV
pub mod importer;

// 配置层 - 阈值
pub mod config;

// 引擎层 - 风险评分与规则
pub mod engine;

// API 层 - 页面报表
pub mod api;

// 应用层 - 加载与共享状态
pub mod app;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 性能埋点
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AgingBucket, DataSourceMode, MetricsSource, PoStatus, RiskLevel, SupplierScoringStrategy,
    SupplierSegment,
};

// 领域记录
pub use domain::{
    ActionCategory, Dataset, Insight, InsightCode, InventoryRiskRecord, PoLeadTimeRecord,
    ProductionImpactRecord, RecommendedAction, SupplierRiskRecord, WhatIfResult,
};

// 引擎
pub use engine::{
    AnalysisScope, InventoryRiskAnalyzer, OverviewCalculator, PoLeadTimeAnalyzer,
    ProductionImpactAnalyzer, SupplierRiskAnalyzer,
};

// API
pub use api::{ApiError, ApiResult, FullReport, RiskDashboardApi};

// 配置
pub use config::{ConfigManager, RiskThresholds};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "FMCG 采购风险分析";
