// ==========================================
// FMCG 采购风险分析 - 洞察与建议动作
// ==========================================
// 职责: 规则引擎输出的结构化数据 (无渲染逻辑)
// ==========================================

use crate::domain::types::RiskLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// InsightCode - 洞察类型
// ==========================================
// 测试按 code 断言,message 随语言变化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightCode {
    // 供应商
    SupplierHighRisk,
    SupplierMainBottleneck,
    SupplierSlowestLeadTime,
    SupplierNoRisk,

    // 库存
    InventoryHighRisk,
    InventoryBelowDoiTarget,
    InventoryHighVolatility,
    InventoryStable,

    // PO 交期
    PoHighLateRate,
    PoWorstSupplier,
    PoNoData,

    // 生产影响
    ProductionHighImpact,
    ProductionTopLoss,
    ProductionNoRisk,
}

/// 单条洞察
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub code: InsightCode,
    pub level: RiskLevel,
    pub message: String,
}

impl Insight {
    pub fn new(code: InsightCode, level: RiskLevel, message: impl Into<String>) -> Self {
        Self {
            code,
            level,
            message: message.into(),
        }
    }
}

// ==========================================
// ActionCategory - 触发建议动作的风险条件
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionCategory {
    BottleneckSupplier,
    StrategicSupplier,
    HighInventoryRisk,
    BelowDoiTarget,
    OverdueOpenPo,
    HighLateRateSupplier,
    ProductionStockout,
}

impl ActionCategory {
    pub const ALL: [ActionCategory; 7] = [
        ActionCategory::BottleneckSupplier,
        ActionCategory::StrategicSupplier,
        ActionCategory::HighInventoryRisk,
        ActionCategory::BelowDoiTarget,
        ActionCategory::OverdueOpenPo,
        ActionCategory::HighLateRateSupplier,
        ActionCategory::ProductionStockout,
    ];
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::BottleneckSupplier => write!(f, "BOTTLENECK_SUPPLIER"),
            ActionCategory::StrategicSupplier => write!(f, "STRATEGIC_SUPPLIER"),
            ActionCategory::HighInventoryRisk => write!(f, "HIGH_INVENTORY_RISK"),
            ActionCategory::BelowDoiTarget => write!(f, "BELOW_DOI_TARGET"),
            ActionCategory::OverdueOpenPo => write!(f, "OVERDUE_OPEN_PO"),
            ActionCategory::HighLateRateSupplier => write!(f, "HIGH_LATE_RATE_SUPPLIER"),
            ActionCategory::ProductionStockout => write!(f, "PRODUCTION_STOCKOUT"),
        }
    }
}

/// 建议动作记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAction {
    /// 对象 (供应商 / 物料 / 物料×产品 / 管理领域)
    pub subject: String,
    pub category: ActionCategory,
    pub area: String,
    pub risk_level: RiskLevel,
    pub issue: String,
    pub action: String,
}
