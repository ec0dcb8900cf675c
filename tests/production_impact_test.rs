// ==========================================
// ProductionImpactAnalyzer 集成测试
// ==========================================
// 测试目标: 物料×产品暴露量 / 损失估算 / 影响评分 / What-if 模拟
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use procurement_risk::config::RiskThresholds;
use procurement_risk::domain::insight::{ActionCategory, InsightCode};
use procurement_risk::engine::production::stockout_urgency;
use procurement_risk::engine::{AnalysisError, ProductionImpactAnalyzer};
use procurement_risk::i18n;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_sample_ranking_and_losses() {
    let report =
        ProductionImpactAnalyzer::new().analyze(&sample_dataset(), &RiskThresholds::default());

    let keys: Vec<(&str, &str)> = report
        .records
        .iter()
        .map(|r| (r.material_id.as_str(), r.product_id.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![("M1", "P1"), ("M1", "P2"), ("M2", "P2"), ("M2", "P1")]
    );

    let top = &report.records[0];
    assert!(approx(top.consumed_qty, 24.0));
    assert_eq!(top.days_to_stockout, Some(2.0));
    assert!(approx(top.production_loss_units, 24.0));
    assert!(approx(top.estimated_revenue_loss, 360_000.0));
    assert!(approx(top.stockout_urgency, 0.5));
    assert!(approx(top.loss_norm, 1.0));
    assert!(approx(top.impact_risk_score, 0.7));

    // dts >= 7: 部分中断 30%
    let m2p1 = report
        .records
        .iter()
        .find(|r| r.material_id == "M2" && r.product_id == "P1")
        .unwrap();
    assert!(approx(m2p1.production_loss_units, 2.4));
    assert!(approx(m2p1.impact_risk_score, 0.06));
}

#[test]
fn test_kpis_insights_actions() {
    let report =
        ProductionImpactAnalyzer::new().analyze(&sample_dataset(), &RiskThresholds::default());

    assert_eq!(report.kpis.combination_count, 4);
    assert_eq!(report.kpis.materials_at_risk, 1);
    assert!(approx(report.kpis.total_loss_units, 36.0));
    assert!(approx(report.kpis.total_revenue_loss, 540_000.0));
    assert_eq!(report.kpis.avg_days_to_stockout, Some(16.0));

    let codes: Vec<InsightCode> = report.insights.iter().map(|i| i.code).collect();
    assert_eq!(
        codes,
        vec![InsightCode::ProductionHighImpact, InsightCode::ProductionTopLoss]
    );

    assert_eq!(report.actions.len(), 2);
    assert!(report
        .actions
        .iter()
        .all(|a| a.category == ActionCategory::ProductionStockout));
    assert_eq!(
        report.actions[0].subject,
        i18n::t_with_args("action.material_product", &[("material", "M1"), ("product", "P1")])
    );
}

#[test]
fn test_missing_inventory_uses_partial_loss() {
    let ds = DatasetBuilder::new()
        .consumption(consumption("MX", "P1", date(2024, 1, 1), 10.0))
        .build();
    let report = ProductionImpactAnalyzer::new().analyze(&ds, &RiskThresholds::default());

    let r = &report.records[0];
    assert_eq!(r.stock_on_hand, None);
    assert_eq!(r.days_to_stockout, None);
    assert_eq!(r.stockout_urgency, 0.0);
    assert!(approx(r.production_loss_units, 3.0));
    assert_eq!(report.insights[0].code, InsightCode::ProductionNoRisk);
    assert!(report.actions.is_empty());
}

#[test]
fn test_stockout_urgency_is_reciprocal() {
    assert_eq!(stockout_urgency(Some(0.0)), 0.0);
    assert_eq!(stockout_urgency(Some(0.5)), 2.0);
    assert_eq!(stockout_urgency(Some(4.0)), 0.25);
    assert_eq!(stockout_urgency(None), 0.0);
}

#[test]
fn test_sub_day_coverage_scores_above_one() {
    let ds = DatasetBuilder::new()
        .inventory(InventoryBuilder::new("M1").stock(5.0).daily_consumption(10.0).build())
        .consumption(consumption("M1", "P1", date(2024, 1, 1), 10.0))
        .build();
    let report = ProductionImpactAnalyzer::new().analyze(&ds, &RiskThresholds::default());

    let r = &report.records[0];
    assert_eq!(r.days_to_stockout, Some(0.5));
    assert!(approx(r.stockout_urgency, 2.0));
    assert!(approx(r.impact_risk_score, 1.6));
}

// ==========================================
// What-if 模拟
// ==========================================

#[test]
fn test_what_if_crosses_short_horizon() {
    let ds = DatasetBuilder::new()
        .inventory(InventoryBuilder::new("M1").stock(6.0).daily_consumption(1.0).build())
        .consumption(consumption("M1", "P1", date(2024, 1, 1), 10.0))
        .build();
    let analyzer = ProductionImpactAnalyzer::new();
    let thresholds = RiskThresholds::default();
    let report = analyzer.analyze(&ds, &thresholds);

    // 6 天 → 提升 10% 后 6.6 天,仍在短期窗口
    let ten = analyzer.what_if(&report.records, 10, &thresholds).unwrap();
    assert!(approx(ten.total_adjusted_loss, 150_000.0));
    assert!(approx(ten.saving, 0.0));

    // 提升 20% 后 7.2 天,保留 40%
    let twenty = analyzer.what_if(&report.records, 20, &thresholds).unwrap();
    assert!(approx(twenty.records[0].adjusted_stock.unwrap(), 7.2));
    assert!(approx(twenty.total_adjusted_loss, 60_000.0));
    assert!(approx(twenty.saving, 90_000.0));
}

#[test]
fn test_what_if_curve_is_monotone() {
    let analyzer = ProductionImpactAnalyzer::new();
    let thresholds = RiskThresholds::default();
    let report = analyzer.analyze(&sample_dataset(), &thresholds);

    let curve = analyzer.what_if_curve(&report.records, &thresholds).unwrap();
    assert_eq!(curve.len(), 11);
    assert_eq!(curve[0].coverage_improvement_pct, 0);
    assert_eq!(curve[10].coverage_improvement_pct, 50);

    for pair in curve.windows(2) {
        assert!(pair[1].total_adjusted_loss <= pair[0].total_adjusted_loss);
    }
    for point in &curve {
        assert!(point.total_adjusted_loss <= point.total_original_loss);
        assert!(approx(point.total_original_loss, report.kpis.total_revenue_loss));
    }
}

#[test]
fn test_what_if_rejects_invalid_pct() {
    let analyzer = ProductionImpactAnalyzer::new();
    let thresholds = RiskThresholds::default();

    for pct in [7, 55, 100] {
        let err = analyzer.what_if(&[], pct, &thresholds).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidCoverageImprovement { pct: p, .. } if p == pct
        ));
    }
}

#[test]
fn test_what_if_empty_records() {
    let result = ProductionImpactAnalyzer::new()
        .what_if(&[], 25, &RiskThresholds::default())
        .unwrap();
    assert!(result.records.is_empty());
    assert_eq!(result.saving, 0.0);
}
