// ==========================================
// FMCG 采购风险分析 - 输入记录模型
// ==========================================
// 职责: 五张事务表的行结构 (只读快照)
// 来源: Purchase_Order / Goods_Receipt / Inventory /
//       Material_Consumption / Supplier_Performance
// ==========================================

use crate::domain::types::{DataSourceMode, PoStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// PurchaseOrder - 采购订单
// ==========================================
// 不变量: po_date <= expected_delivery_date (DQ 校验,不阻断)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub po_number: String,               // 主键
    pub supplier_id: String,             // 供应商ID
    pub supplier_name: String,           // 供应商名称
    pub material_id: String,             // 物料ID
    pub material_name: String,           // 物料名称
    pub po_date: NaiveDate,              // 下单日期
    pub expected_delivery_date: NaiveDate, // 约定交期
    pub ordered_qty: f64,                // 订购数量
    pub unit_price: f64,                 // 单价
    pub po_status: PoStatus,             // 订单状态
}

impl PurchaseOrder {
    /// 订单金额 (ordered_qty × unit_price)
    pub fn spend(&self) -> f64 {
        self.ordered_qty * self.unit_price
    }
}

// ==========================================
// GoodsReceipt - 收货记录
// ==========================================
// 不变量: rejected_qty <= received_qty
// 外键: po_number (按一对多处理)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodsReceipt {
    pub po_number: String,
    pub gr_date: NaiveDate,
    pub received_qty: f64,
    pub rejected_qty: f64,
}

// ==========================================
// InventorySnapshot - 库存快照
// ==========================================
// 不变量: stock_on_hand >= 0, daily_consumption >= 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub material_id: String,
    pub material_name: String,
    pub stock_on_hand: f64,
    pub safety_stock: f64,
    pub daily_consumption: f64,
    pub snapshot_date: Option<NaiveDate>,
}

impl InventorySnapshot {
    /// 库存是否低于安全库存
    pub fn below_safety_stock(&self) -> bool {
        self.stock_on_hand < self.safety_stock
    }
}

// ==========================================
// MaterialConsumption - 物料消耗
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialConsumption {
    pub material_id: String,
    pub material_name: String,
    pub product_id: String,
    pub product_name: String,
    pub production_date: NaiveDate,
    pub consumed_qty: f64,
}

// ==========================================
// SupplierPerformance - 供应商绩效 (可选表)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierPerformance {
    pub supplier_id: String,
    pub on_time_delivery_rate: f64,
    pub avg_lead_time: f64,
    pub rejection_rate: f64,
    pub price_variance: f64,
    pub service_level: Option<f64>,
}

// ==========================================
// SupplierSource - 供应商指标来源 (标签联合)
// ==========================================
// 加载时确定: 无绩效表 → Derived; 有 → Table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SupplierSource {
    Derived,
    Table(Vec<SupplierPerformance>),
}

impl SupplierSource {
    /// 由可选表构造 (空表视同缺失)
    pub fn from_optional(rows: Option<Vec<SupplierPerformance>>) -> Self {
        match rows {
            Some(rows) if !rows.is_empty() => SupplierSource::Table(rows),
            _ => SupplierSource::Derived,
        }
    }

    pub fn mode(&self) -> DataSourceMode {
        match self {
            SupplierSource::Derived => DataSourceMode::Derived,
            SupplierSource::Table(_) => DataSourceMode::WithSupplierPerformance,
        }
    }

    /// 绩效行 (Derived 模式为空切片)
    pub fn rows(&self) -> &[SupplierPerformance] {
        match self {
            SupplierSource::Derived => &[],
            SupplierSource::Table(rows) => rows,
        }
    }
}

// ==========================================
// Dataset - 一次加载的全部基础表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub purchase_orders: Vec<PurchaseOrder>,
    pub goods_receipts: Vec<GoodsReceipt>,
    pub inventory: Vec<InventorySnapshot>,
    pub consumption: Vec<MaterialConsumption>,
    pub supplier_source: SupplierSource,
}

impl Dataset {
    pub fn mode(&self) -> DataSourceMode {
        self.supplier_source.mode()
    }

    /// 空数据集 (Derived 模式)
    pub fn empty() -> Self {
        Self {
            purchase_orders: Vec::new(),
            goods_receipts: Vec::new(),
            inventory: Vec::new(),
            consumption: Vec::new(),
            supplier_source: SupplierSource::Derived,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_source_empty_table_is_derived() {
        assert_eq!(SupplierSource::from_optional(None).mode(), DataSourceMode::Derived);
        assert_eq!(
            SupplierSource::from_optional(Some(Vec::new())).mode(),
            DataSourceMode::Derived
        );
    }

    #[test]
    fn test_supplier_source_with_rows() {
        let source = SupplierSource::from_optional(Some(vec![SupplierPerformance {
            supplier_id: "S1".to_string(),
            on_time_delivery_rate: 0.9,
            avg_lead_time: 10.0,
            rejection_rate: 0.01,
            price_variance: -0.02,
            service_level: None,
        }]));
        assert_eq!(source.mode(), DataSourceMode::WithSupplierPerformance);
        assert_eq!(source.rows().len(), 1);
    }

    #[test]
    fn test_below_safety_stock() {
        let inv = InventorySnapshot {
            material_id: "M1".to_string(),
            material_name: "Sugar".to_string(),
            stock_on_hand: 5.0,
            safety_stock: 10.0,
            daily_consumption: 1.0,
            snapshot_date: None,
        };
        assert!(inv.below_safety_stock());
    }
}
