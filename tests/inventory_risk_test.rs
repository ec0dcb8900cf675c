// ==========================================
// InventoryRiskAnalyzer 集成测试
// ==========================================
// 测试目标: DOI / 波动 / 覆盖风险 / 预警与洞察
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use procurement_risk::config::RiskThresholds;
use procurement_risk::domain::insight::{ActionCategory, InsightCode};
use procurement_risk::engine::{AnalysisScope, InventoryRiskAnalyzer};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_sample_scores_and_ranking() {
    let report = InventoryRiskAnalyzer::new().analyze(&sample_dataset(), &RiskThresholds::default());

    let ids: Vec<&str> = report.records.iter().map(|r| r.material_id.as_str()).collect();
    assert_eq!(ids, vec!["M1", "M3", "M2"]);

    let m1 = &report.records[0];
    assert_eq!(m1.days_of_inventory, Some(2.0));
    assert!(approx(m1.consumption_volatility, 4.0));
    assert!(approx(m1.coverage_risk, 1.0 - 2.0 / 30.0));
    assert!(approx(m1.volatility_norm, 1.0));
    assert!(approx(m1.inventory_risk_score, 0.96));
    assert!(m1.high_risk);
    assert!(m1.early_warning);
    assert!(m1.below_safety_stock);

    // 日耗为 0: DOI 未定义,不参与 max, doi_norm 记 0 → 覆盖风险 1
    let m3 = &report.records[1];
    assert_eq!(m3.days_of_inventory, None);
    assert_eq!(m3.days_to_stockout, None);
    assert_eq!(m3.coverage_risk, 1.0);
    assert!(approx(m3.inventory_risk_score, 0.6));
    assert!(!m3.high_risk);
    assert!(!m3.early_warning);

    let m2 = &report.records[2];
    assert_eq!(m2.coverage_risk, 0.0);
    assert!(approx(m2.inventory_risk_score, 0.4 * 8f64.sqrt() / 4.0));
    assert!(!m2.early_warning);
}

#[test]
fn test_kpis_and_early_warnings() {
    let report = InventoryRiskAnalyzer::new().analyze(&sample_dataset(), &RiskThresholds::default());

    assert_eq!(report.kpis.material_count, 3);
    assert_eq!(report.kpis.avg_days_of_inventory, Some(16.0));
    assert_eq!(report.kpis.doi_delta_vs_target, Some(2.0));
    assert_eq!(report.kpis.below_safety_stock_count, 1);
    assert_eq!(report.kpis.high_risk_count, 1);

    assert_eq!(report.early_warnings.len(), 1);
    assert_eq!(report.early_warnings[0].material_id, "M1");
}

#[test]
fn test_insights_and_actions() {
    let report = InventoryRiskAnalyzer::new().analyze(&sample_dataset(), &RiskThresholds::default());

    let codes: Vec<InsightCode> = report.insights.iter().map(|i| i.code).collect();
    assert_eq!(
        codes,
        vec![
            InsightCode::InventoryHighRisk,
            InsightCode::InventoryBelowDoiTarget,
            InsightCode::InventoryHighVolatility,
        ]
    );

    assert_eq!(report.actions.len(), 1);
    assert_eq!(report.actions[0].subject, "M1");
    assert_eq!(report.actions[0].category, ActionCategory::HighInventoryRisk);
}

#[test]
fn test_zero_stock_has_full_coverage_risk() {
    let ds = DatasetBuilder::new()
        .inventory(InventoryBuilder::new("M1").stock(0.0).daily_consumption(5.0).build())
        .build();
    let report = InventoryRiskAnalyzer::new().analyze(&ds, &RiskThresholds::default());

    let r = &report.records[0];
    assert_eq!(r.days_of_inventory, Some(0.0));
    assert_eq!(r.coverage_risk, 1.0);
    assert!(approx(r.inventory_risk_score, 0.6));
    assert!(r.early_warning);
}

#[test]
fn test_constant_consumption_has_zero_volatility() {
    let ds = DatasetBuilder::new()
        .inventory(InventoryBuilder::new("M1").stock(500.0).daily_consumption(10.0).build())
        .consumption(consumption("M1", "P1", date(2024, 1, 1), 10.0))
        .consumption(consumption("M1", "P1", date(2024, 1, 2), 10.0))
        .consumption(consumption("M1", "P1", date(2024, 1, 3), 10.0))
        .build();
    let report = InventoryRiskAnalyzer::new().analyze(&ds, &RiskThresholds::default());

    let r = &report.records[0];
    assert_eq!(r.consumption_volatility, 0.0);
    assert_eq!(r.volatility_norm, 0.0);
    assert_eq!(r.inventory_risk_score, 0.0);
    assert_eq!(report.insights[0].code, InsightCode::InventoryStable);
}

#[test]
fn test_latest_snapshot_wins() {
    let ds = DatasetBuilder::new()
        .inventory(
            InventoryBuilder::new("M1")
                .stock(10.0)
                .snapshot_date(date(2024, 1, 1))
                .build(),
        )
        .inventory(
            InventoryBuilder::new("M1")
                .stock(200.0)
                .snapshot_date(date(2024, 2, 1))
                .build(),
        )
        .build();
    let report = InventoryRiskAnalyzer::new().analyze(&ds, &RiskThresholds::default());

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].stock_on_hand, 200.0);
}

#[test]
fn test_empty_scope_is_stable() {
    let scoped = AnalysisScope::all()
        .with_materials(["NONE"])
        .apply(&sample_dataset());
    let report = InventoryRiskAnalyzer::new().analyze(&scoped, &RiskThresholds::default());

    assert!(report.records.is_empty());
    assert!(report.early_warnings.is_empty());
    assert_eq!(report.kpis.avg_days_of_inventory, None);
    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.insights[0].code, InsightCode::InventoryStable);
}

#[test]
fn test_scores_bounded() {
    let report = InventoryRiskAnalyzer::new().analyze(&sample_dataset(), &RiskThresholds::default());
    for r in &report.records {
        assert!((0.0..=1.0).contains(&r.inventory_risk_score));
        assert!((0.0..=1.0).contains(&r.coverage_risk));
    }
}

#[test]
fn test_negative_stock_keeps_scores_bounded() {
    let ds = DatasetBuilder::new()
        .inventory(InventoryBuilder::new("M1").stock(-40.0).daily_consumption(10.0).build())
        .inventory(InventoryBuilder::new("M2").stock(200.0).daily_consumption(10.0).build())
        .build();
    let report = InventoryRiskAnalyzer::new().analyze(&ds, &RiskThresholds::default());

    let m1 = report.records.iter().find(|r| r.material_id == "M1").unwrap();
    assert_eq!(m1.days_of_inventory, Some(0.0));
    assert_eq!(m1.coverage_risk, 1.0);
    for r in &report.records {
        assert!((0.0..=1.0).contains(&r.inventory_risk_score));
        assert!((0.0..=1.0).contains(&r.coverage_risk));
    }
}
