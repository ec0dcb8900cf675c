// ==========================================
// FMCG 采购风险分析 - 派生风险记录
// ==========================================
// 职责: 四个分析器的评分输出行
// 红线: 每次按筛选范围重新计算,不持久化
// ==========================================

use crate::domain::types::{AgingBucket, MetricsSource, SupplierSegment};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// SupplierRiskRecord - 供应商风险
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRiskRecord {
    pub supplier_id: String,
    pub supplier_name: String,

    // ===== 订单规模 =====
    pub total_po: usize,     // 去重订单数
    pub total_spend: f64,    // Σ(ordered_qty × unit_price)
    pub dependency: f64,     // 支出占比 (范围内)

    // ===== 交付表现 =====
    pub avg_lead_time: Option<f64>, // 无收货时为 None
    pub late_delivery_rate: f64,
    pub rejection_rate: f64,

    // ===== 绩效表字段 (仅 SupplierPerformance 来源) =====
    pub on_time_delivery_rate: Option<f64>,
    pub price_variance: Option<f64>,
    pub service_level: Option<f64>,

    // ===== 评分 =====
    pub lead_time_norm: f64,
    pub risk_score: f64,
    pub segment: SupplierSegment,
    pub metrics_source: MetricsSource,
}

// ==========================================
// InventoryRiskRecord - 库存风险
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRiskRecord {
    pub material_id: String,
    pub material_name: String,
    pub stock_on_hand: f64,
    pub safety_stock: f64,
    pub daily_consumption: f64,

    /// stock / daily_consumption; 日耗为 0 时 None
    pub days_of_inventory: Option<f64>,
    /// 消耗量样本标准差; 样本 < 2 时为 0
    pub consumption_volatility: f64,

    pub coverage_risk: f64,   // 1 − doi_norm (未定义 DOI 记 0)
    pub volatility_norm: f64, // vol / max_vol
    pub inventory_risk_score: f64,

    pub days_to_stockout: Option<f64>,
    pub below_safety_stock: bool,
    pub high_risk: bool,
    pub early_warning: bool,
}

// ==========================================
// PoLeadTimeRecord - PO 交期明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoLeadTimeRecord {
    pub po_number: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub material_id: String,
    pub material_name: String,
    pub po_date: NaiveDate,
    pub expected_delivery_date: NaiveDate,
    pub gr_date: Option<NaiveDate>,

    pub actual_lead_time: Option<i64>, // 未收货为 None
    pub current_age: i64,              // (gr_date 或 as_of) − po_date
    pub late_flag: bool,
    pub aging_bucket: Option<AgingBucket>, // 负账龄无桶
}

impl PoLeadTimeRecord {
    /// 是否仍未收货
    pub fn is_open(&self) -> bool {
        self.gr_date.is_none()
    }
}

// ==========================================
// LeadTimeBottleneck - 交期瓶颈聚合
// ==========================================
// 按供应商或物料分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadTimeBottleneck {
    pub key: String,
    pub name: String,
    pub avg_lead_time: Option<f64>,
    pub late_rate: f64,
    pub po_count: usize,
}

// ==========================================
// ProductionImpactRecord - 生产影响
// ==========================================
// 键: 物料 × 产品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionImpactRecord {
    pub material_id: String,
    pub material_name: String,
    pub product_id: String,
    pub product_name: String,

    pub consumed_qty: f64, // 暴露量 Σconsumed_qty
    pub stock_on_hand: Option<f64>,
    pub daily_consumption: Option<f64>,

    pub days_to_stockout: Option<f64>,
    pub production_loss_units: f64,
    pub estimated_revenue_loss: f64,

    pub stockout_urgency: f64, // 1/dts, dts 未定义或 <= 0 时为 0
    pub loss_norm: f64,
    pub impact_risk_score: f64,
}

// ==========================================
// What-if 模拟结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfRecord {
    pub material_id: String,
    pub product_id: String,
    pub adjusted_stock: Option<f64>,
    pub adjusted_days_to_stockout: Option<f64>,
    pub original_revenue_loss: f64,
    pub adjusted_revenue_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfResult {
    pub coverage_improvement_pct: u32,
    pub records: Vec<WhatIfRecord>,
    pub total_original_loss: f64,
    pub total_adjusted_loss: f64,
    pub saving: f64,
}
