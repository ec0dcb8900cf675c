// ==========================================
// FMCG 采购风险分析 - 供应商风险分析器
// ==========================================
// 职责: PO + GR 关联 → 供应商指标 → 综合风险评分 → 分群
// 输入: 筛选后的 PO / GR / 可选供应商绩效表
// 输出: SupplierRiskReport (排名表 + KPI + 洞察 + 建议动作)
// 红线: 交期归一分母取当前范围内最大值 (评分随范围变化)
// ==========================================

use crate::config::thresholds::{
    W_DERIVED_LATE, W_DERIVED_LEAD_TIME, W_DERIVED_REJECTION, W_PERF_LEAD_TIME, W_PERF_ON_TIME,
    W_PERF_PRICE_VARIANCE, W_PERF_REJECTION,
};
use crate::config::RiskThresholds;
use crate::domain::insight::{Insight, InsightCode, RecommendedAction};
use crate::domain::records::{Dataset, GoodsReceipt, PurchaseOrder, SupplierPerformance, SupplierSource};
use crate::domain::risk::SupplierRiskRecord;
use crate::domain::types::{
    DataSourceMode, MetricsSource, RiskLevel, SupplierScoringStrategy, SupplierSegment,
};
use crate::engine::join::{join_orders, JoinedOrder};
use crate::engine::rules::{self, classify_segment, SegmentInput, SEGMENT_ACTION_RULES};
use crate::engine::stats;
use crate::i18n;
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::instrument;

// ==========================================
// 报表结构
// ==========================================

/// 供应商页 KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierKpis {
    pub supplier_count: usize,
    pub avg_lead_time: Option<f64>,
    pub avg_late_delivery_rate: Option<f64>,
    pub avg_rejection_rate: Option<f64>,
    pub total_spend: f64,
}

/// 供应商风险报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRiskReport {
    pub mode: DataSourceMode,
    pub strategy: SupplierScoringStrategy,
    /// 全量排名 (risk_score 降序)
    pub records: Vec<SupplierRiskRecord>,
    pub kpis: SupplierKpis,
    pub segment_counts: Vec<(SupplierSegment, usize)>,
    pub insights: Vec<Insight>,
    pub actions: Vec<RecommendedAction>,
}

impl SupplierRiskReport {
    /// 前 N 名视图
    pub fn top(&self, n: usize) -> &[SupplierRiskRecord] {
        &self.records[..n.min(self.records.len())]
    }
}

// ==========================================
// 中间聚合
// ==========================================

#[derive(Debug, Default)]
struct SupplierAggregate<'a> {
    supplier_name: &'a str,
    po_numbers: HashSet<&'a str>,
    rows: usize,
    total_spend: f64,
    lead_times: Vec<f64>,
    late_count: usize,
    received_qty: f64,
    rejected_qty: f64,
}

impl<'a> SupplierAggregate<'a> {
    fn add(&mut self, joined: &JoinedOrder<'a>) {
        if self.supplier_name.is_empty() {
            self.supplier_name = joined.order.supplier_name.as_str();
        }
        self.po_numbers.insert(joined.order.po_number.as_str());
        self.rows += 1;
        self.total_spend += joined.order.spend();
        if let Some(lt) = joined.lead_time() {
            self.lead_times.push(lt as f64);
        }
        if joined.is_late() {
            self.late_count += 1;
        }
        self.received_qty += joined.received_qty();
        self.rejected_qty += joined.rejected_qty();
    }

    fn late_delivery_rate(&self) -> f64 {
        stats::ratio_or_zero(self.late_count as f64, self.rows as f64)
    }

    fn rejection_rate(&self) -> f64 {
        stats::ratio_or_zero(self.rejected_qty, self.received_qty)
    }
}

/// 评分输入 (按策略与数据来源确定)
struct ScoringInputs {
    avg_lead_time: Option<f64>,
    rejection_rate: f64,
    on_time_delivery_rate: f64,
    price_variance: f64,
    metrics_source: MetricsSource,
    performance: Option<SupplierPerformance>,
}

// ==========================================
// SupplierRiskAnalyzer - 供应商风险分析器
// ==========================================
pub struct SupplierRiskAnalyzer {}

impl SupplierRiskAnalyzer {
    /// 创建新的供应商风险分析器
    pub fn new() -> Self {
        Self {}
    }

    /// 按数据源模式的默认策略分析
    pub fn analyze(&self, dataset: &Dataset, thresholds: &RiskThresholds) -> SupplierRiskReport {
        let strategy = SupplierScoringStrategy::for_mode(dataset.mode());
        self.analyze_with_strategy(
            &dataset.purchase_orders,
            &dataset.goods_receipts,
            &dataset.supplier_source,
            strategy,
            thresholds,
        )
    }

    /// 指定评分策略分析
    ///
    /// # 参数
    /// - orders / receipts: 筛选后的 PO 与 GR
    /// - source: 供应商指标来源 (Derived / 绩效表)
    /// - strategy: 评分口径
    /// - thresholds: 阈值配置
    #[instrument(skip_all, fields(orders = orders.len(), strategy = %strategy))]
    pub fn analyze_with_strategy(
        &self,
        orders: &[PurchaseOrder],
        receipts: &[GoodsReceipt],
        source: &SupplierSource,
        strategy: SupplierScoringStrategy,
        thresholds: &RiskThresholds,
    ) -> SupplierRiskReport {
        let _perf = PerfGuard::new("supplier_risk");

        let records = self.score(orders, receipts, source, strategy, thresholds);
        let kpis = self.kpis(&records);
        let segment_counts = SupplierSegment::ALL
            .iter()
            .map(|seg| (*seg, records.iter().filter(|r| r.segment == *seg).count()))
            .collect();
        let insights = self.insights(&records, thresholds);
        let actions = self.actions(&records);

        tracing::debug!(
            suppliers = records.len(),
            insights = insights.len(),
            actions = actions.len(),
            "供应商风险分析完成"
        );

        SupplierRiskReport {
            mode: source.mode(),
            strategy,
            records,
            kpis,
            segment_counts,
            insights,
            actions,
        }
    }

    // ==========================================
    // 评分
    // ==========================================

    /// 计算供应商风险记录 (已按 risk_score 降序排名)
    ///
    /// # 边界
    /// - 范围内无订单的供应商不产生记录
    /// - 无已收货订单的供应商 avg_lead_time 为 None,不参与交期归一
    pub fn score(
        &self,
        orders: &[PurchaseOrder],
        receipts: &[GoodsReceipt],
        source: &SupplierSource,
        strategy: SupplierScoringStrategy,
        thresholds: &RiskThresholds,
    ) -> Vec<SupplierRiskRecord> {
        let joined = join_orders(orders, receipts);

        let mut aggregates: BTreeMap<&str, SupplierAggregate> = BTreeMap::new();
        for row in &joined {
            aggregates
                .entry(row.order.supplier_id.as_str())
                .or_default()
                .add(row);
        }

        let performance: HashMap<&str, &SupplierPerformance> = source
            .rows()
            .iter()
            .map(|p| (p.supplier_id.as_str(), p))
            .collect();

        let inputs: Vec<(&str, &SupplierAggregate, ScoringInputs)> = aggregates
            .iter()
            .filter(|(_, agg)| !agg.po_numbers.is_empty())
            .map(|(id, agg)| {
                let perf = match strategy {
                    SupplierScoringStrategy::SupplierPerformance => performance.get(id).copied(),
                    SupplierScoringStrategy::DerivedPoGr => None,
                };
                (*id, agg, scoring_inputs(agg, perf))
            })
            .collect();

        let max_lead_time = stats::max_finite(inputs.iter().filter_map(|(_, _, i)| i.avg_lead_time));
        let total_spend: f64 = inputs.iter().map(|(_, agg, _)| agg.total_spend).sum();
        let risk_threshold = match strategy {
            SupplierScoringStrategy::DerivedPoGr => thresholds.supplier_segment_risk_derived,
            SupplierScoringStrategy::SupplierPerformance => {
                thresholds.supplier_segment_risk_performance
            }
        };

        let mut records: Vec<SupplierRiskRecord> = inputs
            .into_iter()
            .map(|(id, agg, input)| {
                let lead_time_norm = input
                    .avg_lead_time
                    .map(|lt| stats::normalize(lt, max_lead_time))
                    .unwrap_or(0.0);
                let risk_score = composite_score(strategy, agg, &input, lead_time_norm);
                let dependency = stats::ratio_or_zero(agg.total_spend, total_spend);
                let segment = classify_segment(&SegmentInput {
                    dependency,
                    risk_score,
                    dependency_threshold: thresholds.supplier_dependency_threshold,
                    risk_threshold,
                });

                SupplierRiskRecord {
                    supplier_id: id.to_string(),
                    supplier_name: agg.supplier_name.to_string(),
                    total_po: agg.po_numbers.len(),
                    total_spend: agg.total_spend,
                    dependency,
                    avg_lead_time: input.avg_lead_time,
                    late_delivery_rate: agg.late_delivery_rate(),
                    rejection_rate: input.rejection_rate,
                    on_time_delivery_rate: input
                        .performance
                        .as_ref()
                        .map(|p| p.on_time_delivery_rate),
                    price_variance: input.performance.as_ref().map(|p| p.price_variance),
                    service_level: input.performance.as_ref().and_then(|p| p.service_level),
                    lead_time_norm,
                    risk_score,
                    segment,
                    metrics_source: input.metrics_source,
                }
            })
            .collect();

        rank(&mut records);
        records
    }

    // ==========================================
    // KPI / 洞察 / 动作
    // ==========================================

    pub fn kpis(&self, records: &[SupplierRiskRecord]) -> SupplierKpis {
        SupplierKpis {
            supplier_count: records.len(),
            avg_lead_time: stats::mean(records.iter().filter_map(|r| r.avg_lead_time)),
            avg_late_delivery_rate: stats::mean(records.iter().map(|r| r.late_delivery_rate)),
            avg_rejection_rate: stats::mean(records.iter().map(|r| r.rejection_rate)),
            total_spend: records.iter().map(|r| r.total_spend).sum(),
        }
    }

    /// 洞察 (基于全量排名表)
    ///
    /// 顺序: 高风险数量 → 主要瓶颈供应商 → 交期最长供应商; 无风险时附 "无风险" 提示
    pub fn insights(&self, records: &[SupplierRiskRecord], thresholds: &RiskThresholds) -> Vec<Insight> {
        let mut insights = Vec::new();

        let high_risk = records
            .iter()
            .filter(|r| r.risk_score > thresholds.supplier_high_risk_score)
            .count();
        if high_risk > 0 {
            insights.push(Insight::new(
                InsightCode::SupplierHighRisk,
                RiskLevel::High,
                i18n::t_with_args(
                    "supplier.high_risk",
                    &[
                        ("count", high_risk.to_string().as_str()),
                        ("threshold", thresholds.supplier_high_risk_score.to_string().as_str()),
                    ],
                ),
            ));
        }

        // 排名表已降序,首个瓶颈即风险最高者
        let bottleneck = records
            .iter()
            .find(|r| r.segment == SupplierSegment::Bottleneck);
        if let Some(b) = bottleneck {
            insights.push(Insight::new(
                InsightCode::SupplierMainBottleneck,
                RiskLevel::Medium,
                i18n::t_with_args(
                    "supplier.main_bottleneck",
                    &[
                        ("name", b.supplier_name.as_str()),
                        ("score", format!("{:.2}", b.risk_score).as_str()),
                    ],
                ),
            ));
        }

        if high_risk == 0 && bottleneck.is_none() {
            insights.push(Insight::new(
                InsightCode::SupplierNoRisk,
                RiskLevel::Low,
                i18n::t("supplier.no_risk"),
            ));
        }

        let slowest = records
            .iter()
            .filter_map(|r| r.avg_lead_time.map(|lt| (r, lt)))
            .fold(None::<(&SupplierRiskRecord, f64)>, |acc, (r, lt)| match acc {
                Some((_, best)) if best >= lt => acc,
                _ => Some((r, lt)),
            });
        if let Some((r, lt)) = slowest {
            insights.push(Insight::new(
                InsightCode::SupplierSlowestLeadTime,
                RiskLevel::Low,
                i18n::t_with_args(
                    "supplier.slowest_lead_time",
                    &[
                        ("name", r.supplier_name.as_str()),
                        ("days", format!("{:.1}", lt).as_str()),
                    ],
                ),
            ));
        }

        insights
    }

    /// 建议动作: Bottleneck → High, Strategic → Low
    pub fn actions(&self, records: &[SupplierRiskRecord]) -> Vec<RecommendedAction> {
        records
            .iter()
            .filter_map(|r| {
                SEGMENT_ACTION_RULES
                    .evaluate(&r.segment)
                    .outcome
                    .map(|category| rules::recommend(category, r.supplier_name.clone()))
            })
            .collect()
    }
}

impl Default for SupplierRiskAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 内部函数
// ==========================================

/// 确定评分输入
///
/// 绩效表有该供应商时取表内指标; 否则回落到 PO+GR 派生值
/// (准时率 = 1 − 迟交率, 价格偏差 = 0)
fn scoring_inputs(agg: &SupplierAggregate, perf: Option<&SupplierPerformance>) -> ScoringInputs {
    match perf {
        Some(p) => ScoringInputs {
            avg_lead_time: Some(p.avg_lead_time).filter(|v| v.is_finite()),
            rejection_rate: p.rejection_rate,
            on_time_delivery_rate: p.on_time_delivery_rate,
            price_variance: p.price_variance,
            metrics_source: MetricsSource::SupplierPerformance,
            performance: Some(p.clone()),
        },
        None => ScoringInputs {
            avg_lead_time: stats::mean(agg.lead_times.iter().copied()),
            rejection_rate: agg.rejection_rate(),
            on_time_delivery_rate: 1.0 - agg.late_delivery_rate(),
            price_variance: 0.0,
            metrics_source: MetricsSource::PoGr,
            performance: None,
        },
    }
}

/// 综合风险评分
fn composite_score(
    strategy: SupplierScoringStrategy,
    agg: &SupplierAggregate,
    input: &ScoringInputs,
    lead_time_norm: f64,
) -> f64 {
    match strategy {
        SupplierScoringStrategy::DerivedPoGr => {
            W_DERIVED_LATE * agg.late_delivery_rate()
                + W_DERIVED_REJECTION * input.rejection_rate
                + W_DERIVED_LEAD_TIME * lead_time_norm
        }
        SupplierScoringStrategy::SupplierPerformance => {
            W_PERF_ON_TIME * (1.0 - input.on_time_delivery_rate)
                + W_PERF_REJECTION * input.rejection_rate
                + W_PERF_PRICE_VARIANCE * input.price_variance.abs()
                + W_PERF_LEAD_TIME * lead_time_norm
        }
    }
}

/// 降序排名 (同分按 supplier_id 升序)
fn rank(records: &mut [SupplierRiskRecord]) {
    records.sort_by(|a, b| {
        b.risk_score
            .total_cmp(&a.risk_score)
            .then_with(|| a.supplier_id.cmp(&b.supplier_id))
    });
}
