// ==========================================
// FMCG 采购风险分析 - 生产影响分析器
// ==========================================
// 职责: 物料×产品暴露量 + 库存覆盖 → 产量损失 / 收入损失 → 影响评分
//       覆盖提升 What-if 模拟
// 输入: 筛选后的物料消耗 + 库存快照
// 输出: ProductionImpactReport / WhatIfResult
// 红线: What-if 是 (评分表, 提升比例) 的纯函数,无跨调用状态
// ==========================================

use crate::config::thresholds::{
    PARTIAL_DISRUPTION_FACTOR, RESIDUAL_LOSS_FACTOR, WHAT_IF_MAX_PCT, WHAT_IF_STEP_PCT,
    W_IMPACT_LOSS, W_IMPACT_STOCKOUT,
};
use crate::config::RiskThresholds;
use crate::domain::insight::{ActionCategory, Insight, InsightCode, RecommendedAction};
use crate::domain::records::{Dataset, InventorySnapshot, MaterialConsumption};
use crate::domain::risk::{ProductionImpactRecord, WhatIfRecord, WhatIfResult};
use crate::domain::types::RiskLevel;
use crate::engine::error::{AnalysisError, AnalysisResult};
use crate::engine::join::latest_inventory;
use crate::engine::rules;
use crate::engine::stats;
use crate::i18n;
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::instrument;

/// 生产影响页 KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionKpis {
    pub combination_count: usize,
    /// dts < 短期断货阈值的物料数 (去重)
    pub materials_at_risk: usize,
    pub total_loss_units: f64,
    pub total_revenue_loss: f64,
    pub avg_days_to_stockout: Option<f64>,
}

/// 生产影响报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionImpactReport {
    /// 全量排名 (impact_risk_score 降序)
    pub records: Vec<ProductionImpactRecord>,
    pub kpis: ProductionKpis,
    pub insights: Vec<Insight>,
    pub actions: Vec<RecommendedAction>,
}

impl ProductionImpactReport {
    pub fn top(&self, n: usize) -> &[ProductionImpactRecord] {
        &self.records[..n.min(self.records.len())]
    }
}

/// 断货紧迫度: dts > 0 → 1/dts; 其余 (含未定义) → 0
pub fn stockout_urgency(days_to_stockout: Option<f64>) -> f64 {
    match days_to_stockout {
        Some(d) if d > 0.0 => 1.0 / d,
        _ => 0.0,
    }
}

/// 是否落入短期断货窗口 (未定义视为否)
fn within_short_horizon(days_to_stockout: Option<f64>, thresholds: &RiskThresholds) -> bool {
    days_to_stockout.map_or(false, |d| d < thresholds.short_horizon_stockout_days)
}

// ==========================================
// ProductionImpactAnalyzer - 生产影响分析器
// ==========================================
pub struct ProductionImpactAnalyzer {}

impl ProductionImpactAnalyzer {
    pub fn new() -> Self {
        Self {}
    }

    pub fn analyze(&self, dataset: &Dataset, thresholds: &RiskThresholds) -> ProductionImpactReport {
        self.analyze_tables(&dataset.consumption, &dataset.inventory, thresholds)
    }

    #[instrument(skip_all, fields(consumption = consumption.len(), inventory = inventory.len()))]
    pub fn analyze_tables(
        &self,
        consumption: &[MaterialConsumption],
        inventory: &[InventorySnapshot],
        thresholds: &RiskThresholds,
    ) -> ProductionImpactReport {
        let _perf = PerfGuard::new("production_impact");

        let records = self.score(consumption, inventory, thresholds);
        let kpis = self.kpis(&records, thresholds);
        let insights = self.insights(&records, thresholds);
        let actions = self.actions(&records, thresholds);

        tracing::debug!(
            combinations = records.len(),
            materials_at_risk = kpis.materials_at_risk,
            total_revenue_loss = kpis.total_revenue_loss,
            "生产影响分析完成"
        );

        ProductionImpactReport {
            records,
            kpis,
            insights,
            actions,
        }
    }

    /// 计算物料×产品影响记录 (已按影响评分降序排名)
    ///
    /// # 规则
    /// - 暴露量 = Σconsumed_qty (按物料×产品)
    /// - dts = max(stock, 0) / 日耗; 日耗 <= 0 或无库存记录时未定义
    /// - dts < 7 → 损失 = 全部暴露量; 否则 (含未定义) 30%
    /// - 收入损失 = 损失 × 单位收入
    /// - 评分 = 0.6 × 紧迫度 + 0.4 × 损失/max(损失)
    pub fn score(
        &self,
        consumption: &[MaterialConsumption],
        inventory: &[InventorySnapshot],
        thresholds: &RiskThresholds,
    ) -> Vec<ProductionImpactRecord> {
        let stock: HashMap<&str, &InventorySnapshot> = latest_inventory(inventory)
            .into_iter()
            .map(|inv| (inv.material_id.as_str(), inv))
            .collect();

        let mut exposure: BTreeMap<(&str, &str), (&MaterialConsumption, f64)> = BTreeMap::new();
        for c in consumption {
            exposure
                .entry((c.material_id.as_str(), c.product_id.as_str()))
                .and_modify(|(_, qty)| *qty += c.consumed_qty)
                .or_insert((c, c.consumed_qty));
        }

        let base: Vec<ProductionImpactRecord> = exposure
            .into_values()
            .map(|(first, consumed_qty)| {
                let inv = stock.get(first.material_id.as_str()).copied();
                let stock_on_hand = inv.map(|i| i.stock_on_hand);
                let daily_consumption = inv.map(|i| i.daily_consumption);
                let days_to_stockout = inv.and_then(|i| {
                    stats::ratio_if_positive(i.stock_on_hand.max(0.0), i.daily_consumption)
                });

                let production_loss_units = if within_short_horizon(days_to_stockout, thresholds) {
                    consumed_qty
                } else {
                    consumed_qty * PARTIAL_DISRUPTION_FACTOR
                };

                ProductionImpactRecord {
                    material_id: first.material_id.clone(),
                    material_name: first.material_name.clone(),
                    product_id: first.product_id.clone(),
                    product_name: first.product_name.clone(),
                    consumed_qty,
                    stock_on_hand,
                    daily_consumption,
                    days_to_stockout,
                    production_loss_units,
                    estimated_revenue_loss: production_loss_units * thresholds.assumed_unit_revenue,
                    stockout_urgency: stockout_urgency(days_to_stockout),
                    loss_norm: 0.0,
                    impact_risk_score: 0.0,
                }
            })
            .collect();

        let max_loss = stats::max_finite(base.iter().map(|r| r.production_loss_units));
        let mut records: Vec<ProductionImpactRecord> = base
            .into_iter()
            .map(|mut r| {
                r.loss_norm = stats::normalize(r.production_loss_units, max_loss);
                r.impact_risk_score =
                    W_IMPACT_STOCKOUT * r.stockout_urgency + W_IMPACT_LOSS * r.loss_norm;
                r
            })
            .collect();

        records.sort_by(|a, b| {
            b.impact_risk_score
                .total_cmp(&a.impact_risk_score)
                .then_with(|| a.material_id.cmp(&b.material_id))
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        records
    }

    pub fn kpis(&self, records: &[ProductionImpactRecord], thresholds: &RiskThresholds) -> ProductionKpis {
        let materials_at_risk: HashSet<&str> = records
            .iter()
            .filter(|r| within_short_horizon(r.days_to_stockout, thresholds))
            .map(|r| r.material_id.as_str())
            .collect();

        ProductionKpis {
            combination_count: records.len(),
            materials_at_risk: materials_at_risk.len(),
            total_loss_units: records.iter().map(|r| r.production_loss_units).sum(),
            total_revenue_loss: records.iter().map(|r| r.estimated_revenue_loss).sum(),
            avg_days_to_stockout: stats::mean(records.iter().filter_map(|r| r.days_to_stockout)),
        }
    }

    /// 洞察: 高影响组合数量 → 最大收入损失组合; 无高影响且无短期断货时附 "无风险"
    pub fn insights(&self, records: &[ProductionImpactRecord], thresholds: &RiskThresholds) -> Vec<Insight> {
        let mut insights = Vec::new();

        let high_impact = records
            .iter()
            .filter(|r| r.impact_risk_score > thresholds.production_high_impact_score)
            .count();
        if high_impact > 0 {
            insights.push(Insight::new(
                InsightCode::ProductionHighImpact,
                RiskLevel::High,
                i18n::t_with_args(
                    "production.high_impact",
                    &[("count", high_impact.to_string().as_str())],
                ),
            ));
        }

        let any_short_horizon = records
            .iter()
            .any(|r| within_short_horizon(r.days_to_stockout, thresholds));
        if high_impact == 0 && !any_short_horizon {
            insights.push(Insight::new(
                InsightCode::ProductionNoRisk,
                RiskLevel::Low,
                i18n::t("production.no_risk"),
            ));
        }

        let top_loss = records.iter().fold(None::<&ProductionImpactRecord>, |acc, r| match acc {
            Some(best) if best.estimated_revenue_loss >= r.estimated_revenue_loss => acc,
            _ => Some(r),
        });
        if let Some(top) = top_loss {
            insights.push(Insight::new(
                InsightCode::ProductionTopLoss,
                RiskLevel::Medium,
                i18n::t_with_args(
                    "production.top_loss",
                    &[
                        ("material", top.material_name.as_str()),
                        ("product", top.product_name.as_str()),
                        ("loss", format!("{:.0}", top.estimated_revenue_loss).as_str()),
                    ],
                ),
            ));
        }

        insights
    }

    /// 建议动作: dts < 7 的每个物料×产品组合
    pub fn actions(&self, records: &[ProductionImpactRecord], thresholds: &RiskThresholds) -> Vec<RecommendedAction> {
        records
            .iter()
            .filter(|r| within_short_horizon(r.days_to_stockout, thresholds))
            .map(|r| {
                rules::recommend(
                    ActionCategory::ProductionStockout,
                    i18n::t_with_args(
                        "action.material_product",
                        &[
                            ("material", r.material_name.as_str()),
                            ("product", r.product_name.as_str()),
                        ],
                    ),
                )
            })
            .collect()
    }

    // ==========================================
    // What-if 模拟
    // ==========================================

    /// 覆盖提升模拟
    ///
    /// # 参数
    /// - records: 已评分的影响记录
    /// - coverage_improvement_pct: 0..=50, 步长 5
    ///
    /// # 规则
    /// - adjusted_stock = stock × (1 + pct/100)
    /// - 调整后 dts 仍 < 7 → 保留全部损失; 否则降为原损失的 40%
    pub fn what_if(
        &self,
        records: &[ProductionImpactRecord],
        coverage_improvement_pct: u32,
        thresholds: &RiskThresholds,
    ) -> AnalysisResult<WhatIfResult> {
        validate_improvement_pct(coverage_improvement_pct)?;
        let factor = 1.0 + coverage_improvement_pct as f64 / 100.0;

        let rows: Vec<WhatIfRecord> = records
            .iter()
            .map(|r| {
                let adjusted_stock = r.stock_on_hand.map(|s| s.max(0.0) * factor);
                let adjusted_days_to_stockout = adjusted_stock
                    .zip(r.daily_consumption)
                    .and_then(|(s, dc)| stats::ratio_if_positive(s, dc));
                let adjusted_revenue_loss =
                    if within_short_horizon(adjusted_days_to_stockout, thresholds) {
                        r.estimated_revenue_loss
                    } else {
                        r.estimated_revenue_loss * RESIDUAL_LOSS_FACTOR
                    };

                WhatIfRecord {
                    material_id: r.material_id.clone(),
                    product_id: r.product_id.clone(),
                    adjusted_stock,
                    adjusted_days_to_stockout,
                    original_revenue_loss: r.estimated_revenue_loss,
                    adjusted_revenue_loss,
                }
            })
            .collect();

        let total_original_loss: f64 = rows.iter().map(|r| r.original_revenue_loss).sum();
        let total_adjusted_loss: f64 = rows.iter().map(|r| r.adjusted_revenue_loss).sum();

        tracing::debug!(
            pct = coverage_improvement_pct,
            total_original_loss,
            total_adjusted_loss,
            "What-if 模拟完成"
        );

        Ok(WhatIfResult {
            coverage_improvement_pct,
            records: rows,
            total_original_loss,
            total_adjusted_loss,
            saving: total_original_loss - total_adjusted_loss,
        })
    }

    /// 全部合法提升比例的模拟曲线 (0, 5, ..., 50)
    pub fn what_if_curve(
        &self,
        records: &[ProductionImpactRecord],
        thresholds: &RiskThresholds,
    ) -> AnalysisResult<Vec<WhatIfResult>> {
        (0..=WHAT_IF_MAX_PCT)
            .step_by(WHAT_IF_STEP_PCT as usize)
            .map(|pct| self.what_if(records, pct, thresholds))
            .collect()
    }
}

impl Default for ProductionImpactAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// 校验覆盖提升比例
pub fn validate_improvement_pct(pct: u32) -> AnalysisResult<()> {
    if pct > WHAT_IF_MAX_PCT || pct % WHAT_IF_STEP_PCT != 0 {
        return Err(AnalysisError::InvalidCoverageImprovement {
            pct,
            max: WHAT_IF_MAX_PCT,
            step: WHAT_IF_STEP_PCT,
        });
    }
    Ok(())
}
