// ==========================================
// FMCG 采购风险分析 - 管理层总览
// ==========================================
// 职责: 总支出 / 准时交付率 / 平均交期 / 断货风险比例 与目标对比
// 说明: 有绩效表时准时率与交期取表内均值,否则由 PO+GR 派生
// ==========================================

use crate::config::RiskThresholds;
use crate::domain::records::Dataset;
use crate::domain::types::DataSourceMode;
use crate::engine::join::{join_orders, latest_inventory};
use crate::engine::stats;
use serde::{Deserialize, Serialize};

/// 指标方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiDirection {
    HigherIsBetter,
    LowerIsBetter,
}

/// 带目标值的 KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetedKpi {
    pub value: Option<f64>,
    pub target: f64,
    pub direction: KpiDirection,
    /// 无数据时为 None
    pub meets_target: Option<bool>,
}

impl TargetedKpi {
    fn new(value: Option<f64>, target: f64, direction: KpiDirection) -> Self {
        let meets_target = value.map(|v| match direction {
            KpiDirection::HigherIsBetter => v >= target,
            KpiDirection::LowerIsBetter => v <= target,
        });
        Self {
            value,
            target,
            direction,
            meets_target,
        }
    }
}

/// 总览 KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveOverview {
    pub mode: DataSourceMode,
    pub total_spend: f64,
    pub on_time_delivery_rate: TargetedKpi,
    pub avg_lead_time: TargetedKpi,
    pub stockout_risk: TargetedKpi,
}

pub struct OverviewCalculator {}

impl OverviewCalculator {
    pub fn new() -> Self {
        Self {}
    }

    pub fn compute(&self, dataset: &Dataset, thresholds: &RiskThresholds) -> ExecutiveOverview {
        let total_spend: f64 = dataset.purchase_orders.iter().map(|po| po.spend()).sum();
        let joined = join_orders(&dataset.purchase_orders, &dataset.goods_receipts);

        let (on_time, avg_lead_time) = match dataset.mode() {
            DataSourceMode::WithSupplierPerformance => {
                let rows = dataset.supplier_source.rows();
                (
                    stats::mean(rows.iter().map(|p| p.on_time_delivery_rate)),
                    stats::mean(rows.iter().map(|p| p.avg_lead_time)),
                )
            }
            DataSourceMode::Derived => {
                let received: Vec<_> = joined.iter().filter(|j| j.receipt.is_some()).collect();
                let on_time_count = received.iter().filter(|j| !j.is_late()).count();
                (
                    stats::ratio_if_positive(on_time_count as f64, received.len() as f64),
                    stats::mean(joined.iter().filter_map(|j| j.lead_time()).map(|lt| lt as f64)),
                )
            }
        };

        let materials = latest_inventory(&dataset.inventory);
        let below = materials.iter().filter(|inv| inv.below_safety_stock()).count();
        let stockout_risk = stats::ratio_if_positive(below as f64, materials.len() as f64);

        ExecutiveOverview {
            mode: dataset.mode(),
            total_spend,
            on_time_delivery_rate: TargetedKpi::new(
                on_time,
                thresholds.target_on_time_delivery_rate,
                KpiDirection::HigherIsBetter,
            ),
            avg_lead_time: TargetedKpi::new(
                avg_lead_time,
                thresholds.target_lead_time_days,
                KpiDirection::LowerIsBetter,
            ),
            stockout_risk: TargetedKpi::new(
                stockout_risk,
                thresholds.target_stockout_ratio,
                KpiDirection::LowerIsBetter,
            ),
        }
    }
}

impl Default for OverviewCalculator {
    fn default() -> Self {
        Self::new()
    }
}
