// ==========================================
// FMCG 采购风险分析 - PO 交期分析器
// ==========================================
// 职责: 单据交期 / 迟交标记 / 账龄 → 瓶颈聚合 → 超期未结预警
// 输入: 筛选后的 PO + GR, 基准日 as_of
// 输出: PoLeadTimeReport
// 红线: 账龄以显式 as_of 计算,同一输入结果恒定
// ==========================================

use crate::config::RiskThresholds;
use crate::domain::insight::{ActionCategory, Insight, InsightCode, RecommendedAction};
use crate::domain::records::{Dataset, GoodsReceipt, PurchaseOrder};
use crate::domain::risk::{LeadTimeBottleneck, PoLeadTimeRecord};
use crate::domain::types::{AgingBucket, RiskLevel};
use crate::engine::join::join_orders;
use crate::engine::rules;
use crate::engine::stats;
use crate::i18n;
use crate::perf::PerfGuard;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::instrument;

/// PO 页 KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoLeadTimeKpis {
    pub po_count: usize,
    pub avg_lead_time: Option<f64>,
    pub late_count: usize,
    pub late_rate: Option<f64>,
    pub open_count: usize,
    pub avg_open_age: Option<f64>,
    pub overdue_open_count: usize,
}

/// 账龄分布 (四个桶全部保留,含 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingCount {
    pub bucket: AgingBucket,
    pub label: String,
    pub po_count: usize,
}

/// PO 交期报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoLeadTimeReport {
    pub as_of: NaiveDate,
    pub records: Vec<PoLeadTimeRecord>,
    pub kpis: PoLeadTimeKpis,
    pub aging_distribution: Vec<AgingCount>,
    /// 按迟交率降序
    pub supplier_bottlenecks: Vec<LeadTimeBottleneck>,
    pub material_bottlenecks: Vec<LeadTimeBottleneck>,
    /// 超期未结 PO (账龄降序)
    pub overdue_open_pos: Vec<PoLeadTimeRecord>,
    pub insights: Vec<Insight>,
    pub actions: Vec<RecommendedAction>,
}

impl PoLeadTimeReport {
    pub fn top_overdue(&self, n: usize) -> &[PoLeadTimeRecord] {
        &self.overdue_open_pos[..n.min(self.overdue_open_pos.len())]
    }
}

/// 账龄分桶: [0,7) [7,14) [14,30) [30,∞); 负账龄无桶
pub fn aging_bucket(current_age: i64) -> Option<AgingBucket> {
    match current_age {
        a if a < 0 => None,
        a if a < 7 => Some(AgingBucket::UpTo7Days),
        a if a < 14 => Some(AgingBucket::Days8To14),
        a if a < 30 => Some(AgingBucket::Days15To30),
        _ => Some(AgingBucket::Over30Days),
    }
}

// ==========================================
// PoLeadTimeAnalyzer - PO 交期分析器
// ==========================================
pub struct PoLeadTimeAnalyzer {}

impl PoLeadTimeAnalyzer {
    pub fn new() -> Self {
        Self {}
    }

    pub fn analyze(
        &self,
        dataset: &Dataset,
        as_of: NaiveDate,
        thresholds: &RiskThresholds,
    ) -> PoLeadTimeReport {
        self.analyze_tables(&dataset.purchase_orders, &dataset.goods_receipts, as_of, thresholds)
    }

    #[instrument(skip_all, fields(orders = orders.len(), as_of = %as_of))]
    pub fn analyze_tables(
        &self,
        orders: &[PurchaseOrder],
        receipts: &[GoodsReceipt],
        as_of: NaiveDate,
        thresholds: &RiskThresholds,
    ) -> PoLeadTimeReport {
        let _perf = PerfGuard::new("po_lead_time");

        let records = self.records(orders, receipts, as_of);
        let supplier_bottlenecks = bottlenecks(&records, |r| (&r.supplier_id, &r.supplier_name));
        let material_bottlenecks = bottlenecks(&records, |r| (&r.material_id, &r.material_name));
        let overdue_open_pos = self.overdue_open(&records, thresholds);
        let aging_distribution = self.aging_distribution(&records);
        let kpis = self.kpis(&records, overdue_open_pos.len());
        let insights = self.insights(&kpis, &supplier_bottlenecks, thresholds);
        let actions = self.actions(&overdue_open_pos, &supplier_bottlenecks, thresholds);

        tracing::debug!(
            orders = records.len(),
            overdue = overdue_open_pos.len(),
            late = kpis.late_count,
            "PO 交期分析完成"
        );

        PoLeadTimeReport {
            as_of,
            records,
            kpis,
            aging_distribution,
            supplier_bottlenecks,
            material_bottlenecks,
            overdue_open_pos,
            insights,
            actions,
        }
    }

    /// 单据级交期明细 (保持 PO 输入顺序)
    pub fn records(
        &self,
        orders: &[PurchaseOrder],
        receipts: &[GoodsReceipt],
        as_of: NaiveDate,
    ) -> Vec<PoLeadTimeRecord> {
        join_orders(orders, receipts)
            .into_iter()
            .map(|joined| {
                let po = joined.order;
                let current_age = (joined.gr_date().unwrap_or(as_of) - po.po_date).num_days();
                PoLeadTimeRecord {
                    po_number: po.po_number.clone(),
                    supplier_id: po.supplier_id.clone(),
                    supplier_name: po.supplier_name.clone(),
                    material_id: po.material_id.clone(),
                    material_name: po.material_name.clone(),
                    po_date: po.po_date,
                    expected_delivery_date: po.expected_delivery_date,
                    gr_date: joined.gr_date(),
                    actual_lead_time: joined.lead_time(),
                    current_age,
                    late_flag: joined.is_late(),
                    aging_bucket: aging_bucket(current_age),
                }
            })
            .collect()
    }

    /// 超期未结: 未收货 且 账龄 > 目标交期
    pub fn overdue_open(
        &self,
        records: &[PoLeadTimeRecord],
        thresholds: &RiskThresholds,
    ) -> Vec<PoLeadTimeRecord> {
        let mut overdue: Vec<PoLeadTimeRecord> = records
            .iter()
            .filter(|r| r.is_open() && r.current_age as f64 > thresholds.target_lead_time_days)
            .cloned()
            .collect();
        overdue.sort_by(|a, b| {
            b.current_age
                .cmp(&a.current_age)
                .then_with(|| a.po_number.cmp(&b.po_number))
        });
        overdue
    }

    pub fn aging_distribution(&self, records: &[PoLeadTimeRecord]) -> Vec<AgingCount> {
        AgingBucket::ALL
            .iter()
            .map(|bucket| AgingCount {
                bucket: *bucket,
                label: bucket.label().to_string(),
                po_count: records
                    .iter()
                    .filter(|r| r.aging_bucket == Some(*bucket))
                    .count(),
            })
            .collect()
    }

    pub fn kpis(&self, records: &[PoLeadTimeRecord], overdue_open_count: usize) -> PoLeadTimeKpis {
        let late_count = records.iter().filter(|r| r.late_flag).count();
        let open: Vec<&PoLeadTimeRecord> = records.iter().filter(|r| r.is_open()).collect();
        PoLeadTimeKpis {
            po_count: records.len(),
            avg_lead_time: stats::mean(
                records
                    .iter()
                    .filter_map(|r| r.actual_lead_time.map(|lt| lt as f64)),
            ),
            late_count,
            late_rate: stats::ratio_if_positive(late_count as f64, records.len() as f64),
            open_count: open.len(),
            avg_open_age: stats::mean(open.iter().map(|r| r.current_age as f64)),
            overdue_open_count,
        }
    }

    /// 洞察: 整体迟交率告警 → 最差供应商; 无订单时仅 "无数据"
    pub fn insights(
        &self,
        kpis: &PoLeadTimeKpis,
        supplier_bottlenecks: &[LeadTimeBottleneck],
        thresholds: &RiskThresholds,
    ) -> Vec<Insight> {
        let mut insights = Vec::new();

        let late_rate = match kpis.late_rate {
            Some(rate) => rate,
            None => {
                insights.push(Insight::new(
                    InsightCode::PoNoData,
                    RiskLevel::Low,
                    i18n::t("po.no_data"),
                ));
                return insights;
            }
        };

        if late_rate > thresholds.po_late_rate_alert {
            insights.push(Insight::new(
                InsightCode::PoHighLateRate,
                RiskLevel::High,
                i18n::t_with_args(
                    "po.high_late_rate",
                    &[
                        ("rate", format!("{:.1}%", late_rate * 100.0).as_str()),
                        (
                            "threshold",
                            format!("{:.0}%", thresholds.po_late_rate_alert * 100.0).as_str(),
                        ),
                    ],
                ),
            ));
        }

        if let Some(worst) = supplier_bottlenecks.first() {
            let level = if worst.late_rate > thresholds.supplier_late_rate_action {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            };
            insights.push(Insight::new(
                InsightCode::PoWorstSupplier,
                level,
                i18n::t_with_args(
                    "po.worst_supplier",
                    &[
                        ("name", worst.name.as_str()),
                        ("rate", format!("{:.1}%", worst.late_rate * 100.0).as_str()),
                    ],
                ),
            ));
        }

        insights
    }

    /// 建议动作: 存在超期未结 PO → PO Control; 最差供应商迟交率 > 阈值 → Supplier Management
    pub fn actions(
        &self,
        overdue_open_pos: &[PoLeadTimeRecord],
        supplier_bottlenecks: &[LeadTimeBottleneck],
        thresholds: &RiskThresholds,
    ) -> Vec<RecommendedAction> {
        let mut actions = Vec::new();

        if !overdue_open_pos.is_empty() {
            actions.push(rules::recommend(
                ActionCategory::OverdueOpenPo,
                i18n::t_with_args(
                    "action.overdue_open_pos",
                    &[("count", overdue_open_pos.len().to_string().as_str())],
                ),
            ));
        }

        if let Some(worst) = supplier_bottlenecks.first() {
            if worst.late_rate > thresholds.supplier_late_rate_action {
                actions.push(rules::recommend(
                    ActionCategory::HighLateRateSupplier,
                    worst.name.clone(),
                ));
            }
        }

        actions
    }
}

impl Default for PoLeadTimeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// 按 key 分组聚合交期瓶颈 (迟交率降序, 同值按 key 升序)
fn bottlenecks<F>(records: &[PoLeadTimeRecord], key_of: F) -> Vec<LeadTimeBottleneck>
where
    F: Fn(&PoLeadTimeRecord) -> (&String, &String),
{
    #[derive(Default)]
    struct Group<'a> {
        name: &'a str,
        rows: usize,
        late: usize,
        lead_times: Vec<f64>,
        po_numbers: HashSet<&'a str>,
    }

    let mut groups: BTreeMap<&str, Group> = BTreeMap::new();
    for r in records {
        let (key, name) = key_of(r);
        let group = groups.entry(key.as_str()).or_default();
        if group.name.is_empty() {
            group.name = name.as_str();
        }
        group.rows += 1;
        if r.late_flag {
            group.late += 1;
        }
        if let Some(lt) = r.actual_lead_time {
            group.lead_times.push(lt as f64);
        }
        group.po_numbers.insert(r.po_number.as_str());
    }

    let mut result: Vec<LeadTimeBottleneck> = groups
        .into_iter()
        .map(|(key, g)| LeadTimeBottleneck {
            key: key.to_string(),
            name: g.name.to_string(),
            avg_lead_time: stats::mean(g.lead_times.iter().copied()),
            late_rate: stats::ratio_or_zero(g.late as f64, g.rows as f64),
            po_count: g.po_numbers.len(),
        })
        .collect();

    result.sort_by(|a, b| {
        b.late_rate
            .total_cmp(&a.late_rate)
            .then_with(|| a.key.cmp(&b.key))
    });
    result
}
