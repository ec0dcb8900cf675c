// ==========================================
// FMCG 采购风险分析 - 领域模型层
// ==========================================
// 职责: 输入记录、派生风险记录、洞察与建议动作、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod insight;
pub mod records;
pub mod risk;
pub mod types;

// 重导出核心类型
pub use insight::{ActionCategory, Insight, InsightCode, RecommendedAction};
pub use records::{
    Dataset, GoodsReceipt, InventorySnapshot, MaterialConsumption, PurchaseOrder,
    SupplierPerformance, SupplierSource,
};
pub use risk::{
    InventoryRiskRecord, LeadTimeBottleneck, PoLeadTimeRecord, ProductionImpactRecord,
    SupplierRiskRecord, WhatIfRecord, WhatIfResult,
};
pub use types::{
    AgingBucket, DataSourceMode, MetricsSource, PoStatus, RiskLevel, SupplierScoringStrategy,
    SupplierSegment,
};
