// ==========================================
// FMCG 采购风险分析 - 风险驾驶舱 API
// ==========================================
// 职责: 按筛选范围组装各页面报表 (总览 / 供应商 / 库存 / PO 交期 / 生产影响)
// 架构: API 层 → AnalysisScope 筛选 → Engine 层 (纯计算)
// 红线: 基础表只读共享,每次调用重新计算,不缓存派生结果
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::config::RiskThresholds;
use crate::domain::records::Dataset;
use crate::domain::risk::WhatIfResult;
use crate::domain::types::{DataSourceMode, SupplierScoringStrategy};
use crate::engine::{
    AnalysisScope, ExecutiveOverview, InventoryRiskAnalyzer, InventoryRiskReport,
    OverviewCalculator, PoLeadTimeAnalyzer, PoLeadTimeReport, ProductionImpactAnalyzer,
    ProductionImpactReport, SupplierRiskAnalyzer, SupplierRiskReport,
};
use crate::perf::PerfGuard;

/// 全量报表 (一次筛选下的所有页面)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub as_of: NaiveDate,
    pub mode: DataSourceMode,
    pub scope: AnalysisScope,
    pub thresholds: RiskThresholds,
    pub overview: ExecutiveOverview,
    pub supplier: SupplierRiskReport,
    pub inventory: InventoryRiskReport,
    pub po_lead_time: PoLeadTimeReport,
    pub production: ProductionImpactReport,
    pub what_if: Option<WhatIfResult>,
}

// ==========================================
// RiskDashboardApi - 风险驾驶舱 API
// ==========================================
pub struct RiskDashboardApi {
    dataset: Arc<Dataset>,
    thresholds: RiskThresholds,
    /// 账龄基准日
    as_of: NaiveDate,

    overview: OverviewCalculator,
    supplier: SupplierRiskAnalyzer,
    inventory: InventoryRiskAnalyzer,
    lead_time: PoLeadTimeAnalyzer,
    production: ProductionImpactAnalyzer,
}

impl RiskDashboardApi {
    /// 创建新的 RiskDashboardApi 实例
    ///
    /// # 参数
    /// - dataset: 一次加载的基础表 (只读共享)
    /// - thresholds: 生效阈值
    /// - as_of: PO 账龄基准日
    pub fn new(dataset: Arc<Dataset>, thresholds: RiskThresholds, as_of: NaiveDate) -> Self {
        Self {
            dataset,
            thresholds,
            as_of,
            overview: OverviewCalculator::new(),
            supplier: SupplierRiskAnalyzer::new(),
            inventory: InventoryRiskAnalyzer::new(),
            lead_time: PoLeadTimeAnalyzer::new(),
            production: ProductionImpactAnalyzer::new(),
        }
    }

    pub fn mode(&self) -> DataSourceMode {
        self.dataset.mode()
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    fn filtered(&self, scope: &AnalysisScope) -> Dataset {
        scope.apply(&self.dataset)
    }

    // ==========================================
    // 页面报表
    // ==========================================

    /// 管理层总览
    pub fn overview(&self, scope: &AnalysisScope) -> ExecutiveOverview {
        self.overview.compute(&self.filtered(scope), &self.thresholds)
    }

    /// 供应商风险 (按数据源模式的默认评分策略)
    pub fn supplier_risk(&self, scope: &AnalysisScope) -> SupplierRiskReport {
        self.supplier.analyze(&self.filtered(scope), &self.thresholds)
    }

    /// 供应商风险 (指定评分策略)
    pub fn supplier_risk_with_strategy(
        &self,
        scope: &AnalysisScope,
        strategy: SupplierScoringStrategy,
    ) -> SupplierRiskReport {
        let data = self.filtered(scope);
        self.supplier.analyze_with_strategy(
            &data.purchase_orders,
            &data.goods_receipts,
            &data.supplier_source,
            strategy,
            &self.thresholds,
        )
    }

    /// 库存风险
    pub fn inventory_risk(&self, scope: &AnalysisScope) -> InventoryRiskReport {
        self.inventory.analyze(&self.filtered(scope), &self.thresholds)
    }

    /// PO 交期
    pub fn po_lead_time(&self, scope: &AnalysisScope) -> PoLeadTimeReport {
        self.lead_time
            .analyze(&self.filtered(scope), self.as_of, &self.thresholds)
    }

    /// 生产影响
    pub fn production_impact(&self, scope: &AnalysisScope) -> ProductionImpactReport {
        self.production.analyze(&self.filtered(scope), &self.thresholds)
    }

    /// 覆盖提升 What-if
    ///
    /// # 返回
    /// - Err(ApiError::Analysis): 提升比例不在 0..=50 或不是 5 的倍数
    pub fn what_if(
        &self,
        scope: &AnalysisScope,
        coverage_improvement_pct: u32,
    ) -> ApiResult<WhatIfResult> {
        let report = self.production_impact(scope);
        Ok(self
            .production
            .what_if(&report.records, coverage_improvement_pct, &self.thresholds)?)
    }

    /// 全部合法提升比例的 What-if 曲线
    pub fn what_if_curve(&self, scope: &AnalysisScope) -> ApiResult<Vec<WhatIfResult>> {
        let report = self.production_impact(scope);
        Ok(self
            .production
            .what_if_curve(&report.records, &self.thresholds)?)
    }

    /// 全量报表
    ///
    /// # 参数
    /// - scope: 筛选范围
    /// - what_if_pct: 可选的覆盖提升比例
    pub fn full_report(
        &self,
        scope: &AnalysisScope,
        what_if_pct: Option<u32>,
    ) -> ApiResult<FullReport> {
        let _perf = PerfGuard::new("full_report");
        let data = self.filtered(scope);

        let production = self.production.analyze(&data, &self.thresholds);
        let what_if = match what_if_pct {
            Some(pct) => Some(
                self.production
                    .what_if(&production.records, pct, &self.thresholds)?,
            ),
            None => None,
        };

        let report = FullReport {
            as_of: self.as_of,
            mode: data.mode(),
            scope: scope.clone(),
            thresholds: self.thresholds.clone(),
            overview: self.overview.compute(&data, &self.thresholds),
            supplier: self.supplier.analyze(&data, &self.thresholds),
            inventory: self.inventory.analyze(&data, &self.thresholds),
            po_lead_time: self.lead_time.analyze(&data, self.as_of, &self.thresholds),
            production,
            what_if,
        };

        tracing::info!(
            suppliers = report.supplier.records.len(),
            materials = report.inventory.records.len(),
            orders = report.po_lead_time.records.len(),
            combinations = report.production.records.len(),
            "全量报表生成完成"
        );

        Ok(report)
    }
}
