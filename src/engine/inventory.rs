// ==========================================
// FMCG 采购风险分析 - 库存风险分析器
// ==========================================
// 职责: 库存天数 (DOI) + 消耗波动 → 库存风险评分 → 断货预警
// 输入: 筛选后的库存快照 + 物料消耗
// 输出: InventoryRiskReport
// 红线: 日耗为 0 时 DOI 未定义,不参与归一,不产生 ∞
// ==========================================

use crate::config::thresholds::{
    HIGH_VOLATILITY_QUANTILE, W_INVENTORY_COVERAGE, W_INVENTORY_VOLATILITY,
};
use crate::config::RiskThresholds;
use crate::domain::insight::{Insight, InsightCode, RecommendedAction};
use crate::domain::records::{Dataset, InventorySnapshot, MaterialConsumption};
use crate::domain::risk::InventoryRiskRecord;
use crate::domain::types::RiskLevel;
use crate::engine::join::latest_inventory;
use crate::engine::rules::{self, InventoryActionInput, INVENTORY_ACTION_RULES};
use crate::engine::stats;
use crate::i18n;
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// 库存页 KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryKpis {
    pub material_count: usize,
    pub avg_days_of_inventory: Option<f64>,
    /// 平均 DOI − 目标 DOI
    pub doi_delta_vs_target: Option<f64>,
    pub below_safety_stock_count: usize,
    pub avg_risk_score: Option<f64>,
    pub high_risk_count: usize,
}

/// 库存风险报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRiskReport {
    /// 全量排名 (inventory_risk_score 降序)
    pub records: Vec<InventoryRiskRecord>,
    /// 断货预警 (days_to_stockout 升序)
    pub early_warnings: Vec<InventoryRiskRecord>,
    pub kpis: InventoryKpis,
    pub insights: Vec<Insight>,
    pub actions: Vec<RecommendedAction>,
}

impl InventoryRiskReport {
    pub fn top(&self, n: usize) -> &[InventoryRiskRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn top_early_warnings(&self, n: usize) -> &[InventoryRiskRecord] {
        &self.early_warnings[..n.min(self.early_warnings.len())]
    }
}

// ==========================================
// InventoryRiskAnalyzer - 库存风险分析器
// ==========================================
pub struct InventoryRiskAnalyzer {}

impl InventoryRiskAnalyzer {
    pub fn new() -> Self {
        Self {}
    }

    pub fn analyze(&self, dataset: &Dataset, thresholds: &RiskThresholds) -> InventoryRiskReport {
        self.analyze_tables(&dataset.inventory, &dataset.consumption, thresholds)
    }

    #[instrument(skip_all, fields(inventory = inventory.len(), consumption = consumption.len()))]
    pub fn analyze_tables(
        &self,
        inventory: &[InventorySnapshot],
        consumption: &[MaterialConsumption],
        thresholds: &RiskThresholds,
    ) -> InventoryRiskReport {
        let _perf = PerfGuard::new("inventory_risk");

        let records = self.score(inventory, consumption, thresholds);

        let mut early_warnings: Vec<InventoryRiskRecord> =
            records.iter().filter(|r| r.early_warning).cloned().collect();
        early_warnings.sort_by(|a, b| {
            let a_dts = a.days_to_stockout.unwrap_or(f64::MAX);
            let b_dts = b.days_to_stockout.unwrap_or(f64::MAX);
            a_dts
                .total_cmp(&b_dts)
                .then_with(|| a.material_id.cmp(&b.material_id))
        });

        let kpis = self.kpis(&records, thresholds);
        let insights = self.insights(&records, thresholds);
        let actions = self.actions(&records, thresholds);

        tracing::debug!(
            materials = records.len(),
            early_warnings = early_warnings.len(),
            high_risk = kpis.high_risk_count,
            "库存风险分析完成"
        );

        InventoryRiskReport {
            records,
            early_warnings,
            kpis,
            insights,
            actions,
        }
    }

    /// 计算库存风险记录 (已按评分降序排名)
    ///
    /// # 规则
    /// - DOI = stock / daily_consumption (日耗为 0 → None)
    /// - 波动 = 消耗量样本标准差 (样本 < 2 → 0)
    /// - DOI = max(stock, 0) / 日耗; 日耗 <= 0 时未定义, 不参与 max
    /// - coverage_risk = 1 − doi_norm; DOI 未定义或 max 为 0 时 doi_norm = 0
    /// - score = 0.6 × coverage_risk + 0.4 × vol/max(vol)
    pub fn score(
        &self,
        inventory: &[InventorySnapshot],
        consumption: &[MaterialConsumption],
        thresholds: &RiskThresholds,
    ) -> Vec<InventoryRiskRecord> {
        let snapshots = latest_inventory(inventory);

        let mut samples: HashMap<&str, Vec<f64>> = HashMap::new();
        for c in consumption {
            samples
                .entry(c.material_id.as_str())
                .or_default()
                .push(c.consumed_qty);
        }

        let base: Vec<(&InventorySnapshot, Option<f64>, f64)> = snapshots
            .into_iter()
            .map(|inv| {
                let doi = stats::ratio_if_positive(inv.stock_on_hand.max(0.0), inv.daily_consumption);
                let volatility = samples
                    .get(inv.material_id.as_str())
                    .map(|s| stats::sample_std(s))
                    .unwrap_or(0.0);
                (inv, doi, volatility)
            })
            .collect();

        let max_doi = stats::max_finite(base.iter().filter_map(|(_, doi, _)| *doi));
        let max_volatility = stats::max_finite(base.iter().map(|(_, _, vol)| *vol));

        let mut records: Vec<InventoryRiskRecord> = base
            .into_iter()
            .map(|(inv, doi, volatility)| {
                let doi_norm = doi.map_or(0.0, |d| stats::normalize(d, max_doi));
                let coverage_risk = 1.0 - doi_norm;
                let volatility_norm = stats::normalize(volatility, max_volatility);
                let score =
                    W_INVENTORY_COVERAGE * coverage_risk + W_INVENTORY_VOLATILITY * volatility_norm;
                let days_to_stockout = doi;

                InventoryRiskRecord {
                    material_id: inv.material_id.clone(),
                    material_name: inv.material_name.clone(),
                    stock_on_hand: inv.stock_on_hand,
                    safety_stock: inv.safety_stock,
                    daily_consumption: inv.daily_consumption,
                    days_of_inventory: doi,
                    consumption_volatility: volatility,
                    coverage_risk,
                    volatility_norm,
                    inventory_risk_score: score,
                    days_to_stockout,
                    below_safety_stock: inv.below_safety_stock(),
                    high_risk: score > thresholds.inventory_high_risk_score,
                    early_warning: days_to_stockout
                        .map_or(false, |d| d < thresholds.target_days_of_inventory),
                }
            })
            .collect();

        records.sort_by(|a, b| {
            b.inventory_risk_score
                .total_cmp(&a.inventory_risk_score)
                .then_with(|| a.material_id.cmp(&b.material_id))
        });
        records
    }

    pub fn kpis(&self, records: &[InventoryRiskRecord], thresholds: &RiskThresholds) -> InventoryKpis {
        let avg_doi = stats::mean(records.iter().filter_map(|r| r.days_of_inventory));
        InventoryKpis {
            material_count: records.len(),
            avg_days_of_inventory: avg_doi,
            doi_delta_vs_target: avg_doi.map(|d| d - thresholds.target_days_of_inventory),
            below_safety_stock_count: records.iter().filter(|r| r.below_safety_stock).count(),
            avg_risk_score: stats::mean(records.iter().map(|r| r.inventory_risk_score)),
            high_risk_count: records.iter().filter(|r| r.high_risk).count(),
        }
    }

    /// 洞察: 高风险数量 → DOI 低于目标 → 高波动 (高于 0.75 分位); 均未命中时 "库存稳定"
    pub fn insights(&self, records: &[InventoryRiskRecord], thresholds: &RiskThresholds) -> Vec<Insight> {
        let mut insights = Vec::new();

        let high_risk = records.iter().filter(|r| r.high_risk).count();
        if high_risk > 0 {
            insights.push(Insight::new(
                InsightCode::InventoryHighRisk,
                RiskLevel::High,
                i18n::t_with_args(
                    "inventory.high_risk",
                    &[
                        ("count", high_risk.to_string().as_str()),
                        ("threshold", thresholds.inventory_high_risk_score.to_string().as_str()),
                    ],
                ),
            ));
        }

        let below_target = records
            .iter()
            .filter(|r| {
                r.days_of_inventory
                    .map_or(false, |d| d < thresholds.target_days_of_inventory)
            })
            .count();
        if below_target > 0 {
            insights.push(Insight::new(
                InsightCode::InventoryBelowDoiTarget,
                RiskLevel::Medium,
                i18n::t_with_args(
                    "inventory.below_doi_target",
                    &[
                        ("count", below_target.to_string().as_str()),
                        ("target", thresholds.target_days_of_inventory.to_string().as_str()),
                    ],
                ),
            ));
        }

        let volatilities: Vec<f64> = records.iter().map(|r| r.consumption_volatility).collect();
        let high_volatility = stats::quantile(&volatilities, HIGH_VOLATILITY_QUANTILE)
            .map(|q| volatilities.iter().filter(|v| **v > q).count())
            .unwrap_or(0);
        if high_volatility > 0 {
            insights.push(Insight::new(
                InsightCode::InventoryHighVolatility,
                RiskLevel::Medium,
                i18n::t_with_args(
                    "inventory.high_volatility",
                    &[("count", high_volatility.to_string().as_str())],
                ),
            ));
        }

        if insights.is_empty() {
            insights.push(Insight::new(
                InsightCode::InventoryStable,
                RiskLevel::Low,
                i18n::t("inventory.stable"),
            ));
        }

        insights
    }

    /// 建议动作: 高风险 → High; DOI 低于目标 → Medium
    pub fn actions(&self, records: &[InventoryRiskRecord], thresholds: &RiskThresholds) -> Vec<RecommendedAction> {
        records
            .iter()
            .filter_map(|r| {
                let input = InventoryActionInput {
                    risk_score: r.inventory_risk_score,
                    days_of_inventory: r.days_of_inventory,
                    high_risk_threshold: thresholds.inventory_high_risk_score,
                    target_days_of_inventory: thresholds.target_days_of_inventory,
                };
                INVENTORY_ACTION_RULES
                    .evaluate(&input)
                    .outcome
                    .map(|category| rules::recommend(category, r.material_id.clone()))
            })
            .collect()
    }
}

impl Default for InventoryRiskAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(id: &str, stock: f64, safety: f64, daily: f64) -> InventorySnapshot {
        InventorySnapshot {
            material_id: id.to_string(),
            material_name: id.to_string(),
            stock_on_hand: stock,
            safety_stock: safety,
            daily_consumption: daily,
            snapshot_date: None,
        }
    }

    fn consumed(id: &str, qty: f64) -> MaterialConsumption {
        MaterialConsumption {
            material_id: id.to_string(),
            material_name: id.to_string(),
            product_id: "P1".to_string(),
            product_name: "P1".to_string(),
            production_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            consumed_qty: qty,
        }
    }

    #[test]
    fn test_zero_stock_is_max_coverage_risk() {
        let records = InventoryRiskAnalyzer::new().score(
            &[snapshot("X", 0.0, 10.0, 5.0)],
            &[],
            &RiskThresholds::default(),
        );
        let r = &records[0];
        assert_eq!(r.days_of_inventory, Some(0.0));
        assert_eq!(r.days_to_stockout, Some(0.0));
        assert_eq!(r.coverage_risk, 1.0);
        assert!(r.below_safety_stock);
        assert!(r.early_warning);
    }

    #[test]
    fn test_zero_consumption_excluded_from_normalization() {
        let records = InventoryRiskAnalyzer::new().score(
            &[snapshot("A", 100.0, 0.0, 10.0), snapshot("B", 500.0, 0.0, 0.0)],
            &[],
            &RiskThresholds::default(),
        );
        let a = records.iter().find(|r| r.material_id == "A").unwrap();
        let b = records.iter().find(|r| r.material_id == "B").unwrap();

        // B: doi_norm = 0 → 覆盖风险 1
        assert_eq!(b.days_of_inventory, None);
        assert_eq!(b.coverage_risk, 1.0);
        assert_eq!(b.inventory_risk_score, 0.6);
        // A 是唯一有定义的 DOI → 归一为 1
        assert_eq!(a.coverage_risk, 0.0);
        assert!(!b.early_warning);
    }

    #[test]
    fn test_negative_stock_counts_as_empty() {
        let records = InventoryRiskAnalyzer::new().score(
            &[snapshot("A", -50.0, 10.0, 10.0), snapshot("B", 100.0, 10.0, 10.0)],
            &[],
            &RiskThresholds::default(),
        );
        let a = records.iter().find(|r| r.material_id == "A").unwrap();

        assert_eq!(a.stock_on_hand, -50.0);
        assert_eq!(a.days_of_inventory, Some(0.0));
        assert_eq!(a.coverage_risk, 1.0);
        assert!(records
            .iter()
            .all(|r| (0.0..=1.0).contains(&r.inventory_risk_score)));
    }

    #[test]
    fn test_constant_consumption_has_zero_volatility() {
        let consumption = vec![consumed("A", 10.0), consumed("A", 10.0), consumed("A", 10.0)];
        let records = InventoryRiskAnalyzer::new().score(
            &[snapshot("A", 100.0, 0.0, 10.0)],
            &consumption,
            &RiskThresholds::default(),
        );
        assert_eq!(records[0].consumption_volatility, 0.0);
        assert_eq!(records[0].volatility_norm, 0.0);
    }

    #[test]
    fn test_single_sample_volatility_is_zero() {
        let records = InventoryRiskAnalyzer::new().score(
            &[snapshot("A", 100.0, 0.0, 10.0)],
            &[consumed("A", 42.0)],
            &RiskThresholds::default(),
        );
        assert_eq!(records[0].consumption_volatility, 0.0);
    }

    #[test]
    fn test_actions_follow_priority() {
        let analyzer = InventoryRiskAnalyzer::new();
        let thresholds = RiskThresholds::default();
        let consumption = vec![consumed("A", 1.0), consumed("A", 20.0)];
        let report = analyzer.analyze_tables(
            &[
                snapshot("A", 10.0, 0.0, 10.0),
                snapshot("B", 1000.0, 0.0, 10.0),
                snapshot("C", 100.0, 0.0, 10.0),
            ],
            &consumption,
            &thresholds,
        );

        // A: 0.6×0.99 + 0.4×1 → 高风险; C: DOI 10 < 14 → 复核订货点; B: 无动作
        let categories: Vec<_> = report
            .actions
            .iter()
            .map(|a| (a.subject.as_str(), a.category))
            .collect();
        assert_eq!(
            categories,
            vec![
                ("A", crate::domain::insight::ActionCategory::HighInventoryRisk),
                ("C", crate::domain::insight::ActionCategory::BelowDoiTarget),
            ]
        );
        assert_eq!(report.kpis.high_risk_count, 1);
        assert_eq!(report.early_warnings[0].material_id, "A");
    }

    #[test]
    fn test_empty_scope_is_stable() {
        let report = InventoryRiskAnalyzer::new().analyze(&Dataset::empty(), &RiskThresholds::default());
        assert!(report.records.is_empty());
        assert_eq!(report.kpis.avg_days_of_inventory, None);
        assert_eq!(report.insights[0].code, InsightCode::InventoryStable);
    }
}
