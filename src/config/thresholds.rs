// ==========================================
// FMCG 采购风险分析 - 阈值与权重
// ==========================================
// 职责: 所有规则常量集中定义,禁止在分析器内写死数值
// 说明: 不同页面口径不同 (0.2 / 0.4 / 0.6),均以命名常量暴露
// ==========================================

use serde::{Deserialize, Serialize};

// ===== 目标值 =====

/// 目标准时交付率
pub const TARGET_ON_TIME_DELIVERY_RATE: f64 = 0.95;
/// 目标交期 (天)，超过即视为逾期未收货
pub const TARGET_LEAD_TIME_DAYS: f64 = 14.0;
/// 目标缺货比例 (低于安全库存的物料占比)
pub const TARGET_STOCKOUT_RATIO: f64 = 0.05;
/// 目标库存天数
pub const TARGET_DAYS_OF_INVENTORY: f64 = 14.0;

// ===== 生产影响 =====

/// 短期缺货截止 (天)，与 14 天库存目标相互独立
pub const SHORT_HORIZON_STOCKOUT_DAYS: f64 = 7.0;
/// 假设单位收入
pub const ASSUMED_UNIT_REVENUE: f64 = 15_000.0;
/// 部分中断假设: 非短期缺货时损失 30% 消耗量
pub const PARTIAL_DISRUPTION_FACTOR: f64 = 0.3;
/// What-if: 改善后脱离短期缺货,保留 40% 原损失
pub const RESIDUAL_LOSS_FACTOR: f64 = 0.4;
/// What-if 覆盖率提升区间与步长 (%)
pub const WHAT_IF_MAX_PCT: u32 = 50;
pub const WHAT_IF_STEP_PCT: u32 = 5;

// ===== 供应商 =====

/// 依赖度阈值 (支出占比)
pub const SUPPLIER_DEPENDENCY_THRESHOLD: f64 = 0.15;
/// 分群风险阈值 (PO+GR 口径)
pub const SUPPLIER_SEGMENT_RISK_DERIVED: f64 = 0.2;
/// 分群风险阈值 (绩效表口径)
pub const SUPPLIER_SEGMENT_RISK_PERFORMANCE: f64 = 0.15;
/// 供应商高风险洞察阈值
pub const SUPPLIER_HIGH_RISK_SCORE: f64 = 0.4;

// 权重 (PO+GR 口径)
pub const W_DERIVED_LATE: f64 = 0.5;
pub const W_DERIVED_REJECTION: f64 = 0.3;
pub const W_DERIVED_LEAD_TIME: f64 = 0.2;

// 权重 (绩效表口径)
pub const W_PERF_ON_TIME: f64 = 0.4;
pub const W_PERF_REJECTION: f64 = 0.3;
pub const W_PERF_PRICE_VARIANCE: f64 = 0.2;
pub const W_PERF_LEAD_TIME: f64 = 0.1;

// ===== 库存 =====

/// 库存高风险阈值
pub const INVENTORY_HIGH_RISK_SCORE: f64 = 0.6;
pub const W_INVENTORY_COVERAGE: f64 = 0.6;
pub const W_INVENTORY_VOLATILITY: f64 = 0.4;
/// 高波动判定分位数
pub const HIGH_VOLATILITY_QUANTILE: f64 = 0.75;

// ===== PO 交期 =====

/// 整体迟交率预警
pub const PO_LATE_RATE_ALERT: f64 = 0.2;
/// 单供应商迟交率触发 SLA 复审
pub const SUPPLIER_LATE_RATE_ACTION: f64 = 0.3;

// ===== 生产影响评分 =====

pub const PRODUCTION_HIGH_IMPACT_SCORE: f64 = 0.6;
pub const W_IMPACT_STOCKOUT: f64 = 0.6;
pub const W_IMPACT_LOSS: f64 = 0.4;

// ===== 展示 =====

/// 排行榜 / 预警表展示条数
pub const TOP_N: usize = 10;

// ==========================================
// RiskThresholds - 生效阈值集合
// ==========================================
// 默认取上方常量,可被 ConfigManager 覆写
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub target_on_time_delivery_rate: f64,
    pub target_lead_time_days: f64,
    pub target_stockout_ratio: f64,
    pub target_days_of_inventory: f64,

    pub short_horizon_stockout_days: f64,
    pub assumed_unit_revenue: f64,

    pub supplier_dependency_threshold: f64,
    pub supplier_segment_risk_derived: f64,
    pub supplier_segment_risk_performance: f64,
    pub supplier_high_risk_score: f64,

    pub inventory_high_risk_score: f64,
    pub production_high_impact_score: f64,

    pub po_late_rate_alert: f64,
    pub supplier_late_rate_action: f64,

    pub top_n: usize,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            target_on_time_delivery_rate: TARGET_ON_TIME_DELIVERY_RATE,
            target_lead_time_days: TARGET_LEAD_TIME_DAYS,
            target_stockout_ratio: TARGET_STOCKOUT_RATIO,
            target_days_of_inventory: TARGET_DAYS_OF_INVENTORY,
            short_horizon_stockout_days: SHORT_HORIZON_STOCKOUT_DAYS,
            assumed_unit_revenue: ASSUMED_UNIT_REVENUE,
            supplier_dependency_threshold: SUPPLIER_DEPENDENCY_THRESHOLD,
            supplier_segment_risk_derived: SUPPLIER_SEGMENT_RISK_DERIVED,
            supplier_segment_risk_performance: SUPPLIER_SEGMENT_RISK_PERFORMANCE,
            supplier_high_risk_score: SUPPLIER_HIGH_RISK_SCORE,
            inventory_high_risk_score: INVENTORY_HIGH_RISK_SCORE,
            production_high_impact_score: PRODUCTION_HIGH_IMPACT_SCORE,
            po_late_rate_alert: PO_LATE_RATE_ALERT,
            supplier_late_rate_action: SUPPLIER_LATE_RATE_ACTION,
            top_n: TOP_N,
        }
    }
}
