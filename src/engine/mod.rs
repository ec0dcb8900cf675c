// ==========================================
// FMCG 采购风险分析 - 引擎层
// ==========================================
// 职责: 纯函数式风险评分与规则判定
// 红线: 每次按 (基础表, 筛选范围, 阈值) 重新计算,无共享可变状态
// ==========================================

pub mod error;
pub mod inventory;
pub mod join;
pub mod lead_time;
pub mod overview;
pub mod production;
pub mod rules;
pub mod scope;
pub mod stats;
pub mod supplier;

// 重导出核心引擎
pub use error::{AnalysisError, AnalysisResult};
pub use inventory::{InventoryKpis, InventoryRiskAnalyzer, InventoryRiskReport};
pub use lead_time::{AgingCount, PoLeadTimeAnalyzer, PoLeadTimeKpis, PoLeadTimeReport};
pub use overview::{ExecutiveOverview, KpiDirection, OverviewCalculator, TargetedKpi};
pub use production::{ProductionImpactAnalyzer, ProductionImpactReport, ProductionKpis};
pub use rules::{Rule, RuleMatch, RuleTable};
pub use scope::AnalysisScope;
pub use supplier::{SupplierKpis, SupplierRiskAnalyzer, SupplierRiskReport};
