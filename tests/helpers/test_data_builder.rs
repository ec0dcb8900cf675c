// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use procurement_risk::domain::records::{
    Dataset, GoodsReceipt, InventorySnapshot, MaterialConsumption, PurchaseOrder,
    SupplierPerformance, SupplierSource,
};
use procurement_risk::domain::types::PoStatus;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// PurchaseOrder 构建器
// ==========================================

pub struct PoBuilder {
    po_number: String,
    supplier_id: String,
    supplier_name: Option<String>,
    material_id: String,
    material_name: Option<String>,
    po_date: NaiveDate,
    expected_delivery_date: NaiveDate,
    ordered_qty: f64,
    unit_price: f64,
    po_status: PoStatus,
}

impl PoBuilder {
    pub fn new(po_number: &str, supplier_id: &str, material_id: &str) -> Self {
        Self {
            po_number: po_number.to_string(),
            supplier_id: supplier_id.to_string(),
            supplier_name: None,
            material_id: material_id.to_string(),
            material_name: None,
            po_date: date(2024, 1, 1),
            expected_delivery_date: date(2024, 1, 11),
            ordered_qty: 100.0,
            unit_price: 1.0,
            po_status: PoStatus::Open,
        }
    }

    pub fn supplier_name(mut self, name: &str) -> Self {
        self.supplier_name = Some(name.to_string());
        self
    }

    pub fn material_name(mut self, name: &str) -> Self {
        self.material_name = Some(name.to_string());
        self
    }

    pub fn dates(mut self, po_date: NaiveDate, expected: NaiveDate) -> Self {
        self.po_date = po_date;
        self.expected_delivery_date = expected;
        self
    }

    pub fn qty(mut self, qty: f64) -> Self {
        self.ordered_qty = qty;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.unit_price = price;
        self
    }

    pub fn status(mut self, status: PoStatus) -> Self {
        self.po_status = status;
        self
    }

    pub fn build(self) -> PurchaseOrder {
        PurchaseOrder {
            supplier_name: self.supplier_name.unwrap_or_else(|| self.supplier_id.clone()),
            material_name: self.material_name.unwrap_or_else(|| self.material_id.clone()),
            po_number: self.po_number,
            supplier_id: self.supplier_id,
            material_id: self.material_id,
            po_date: self.po_date,
            expected_delivery_date: self.expected_delivery_date,
            ordered_qty: self.ordered_qty,
            unit_price: self.unit_price,
            po_status: self.po_status,
        }
    }
}

/// 收货记录
pub fn receipt(po_number: &str, gr_date: NaiveDate, received: f64, rejected: f64) -> GoodsReceipt {
    GoodsReceipt {
        po_number: po_number.to_string(),
        gr_date,
        received_qty: received,
        rejected_qty: rejected,
    }
}

// ==========================================
// InventorySnapshot 构建器
// ==========================================

pub struct InventoryBuilder {
    material_id: String,
    stock_on_hand: f64,
    safety_stock: f64,
    daily_consumption: f64,
    snapshot_date: Option<NaiveDate>,
}

impl InventoryBuilder {
    pub fn new(material_id: &str) -> Self {
        Self {
            material_id: material_id.to_string(),
            stock_on_hand: 100.0,
            safety_stock: 20.0,
            daily_consumption: 10.0,
            snapshot_date: None,
        }
    }

    pub fn stock(mut self, stock: f64) -> Self {
        self.stock_on_hand = stock;
        self
    }

    pub fn safety_stock(mut self, safety: f64) -> Self {
        self.safety_stock = safety;
        self
    }

    pub fn daily_consumption(mut self, dc: f64) -> Self {
        self.daily_consumption = dc;
        self
    }

    pub fn snapshot_date(mut self, d: NaiveDate) -> Self {
        self.snapshot_date = Some(d);
        self
    }

    pub fn build(self) -> InventorySnapshot {
        InventorySnapshot {
            material_name: self.material_id.clone(),
            material_id: self.material_id,
            stock_on_hand: self.stock_on_hand,
            safety_stock: self.safety_stock,
            daily_consumption: self.daily_consumption,
            snapshot_date: self.snapshot_date,
        }
    }
}

/// 消耗记录
pub fn consumption(
    material_id: &str,
    product_id: &str,
    production_date: NaiveDate,
    qty: f64,
) -> MaterialConsumption {
    MaterialConsumption {
        material_id: material_id.to_string(),
        material_name: material_id.to_string(),
        product_id: product_id.to_string(),
        product_name: product_id.to_string(),
        production_date,
        consumed_qty: qty,
    }
}

/// 供应商绩效行
pub fn performance(
    supplier_id: &str,
    on_time: f64,
    avg_lead_time: f64,
    rejection_rate: f64,
    price_variance: f64,
) -> SupplierPerformance {
    SupplierPerformance {
        supplier_id: supplier_id.to_string(),
        on_time_delivery_rate: on_time,
        avg_lead_time,
        rejection_rate,
        price_variance,
        service_level: None,
    }
}

// ==========================================
// Dataset 构建器
// ==========================================

#[derive(Default)]
pub struct DatasetBuilder {
    orders: Vec<PurchaseOrder>,
    receipts: Vec<GoodsReceipt>,
    inventory: Vec<InventorySnapshot>,
    consumption: Vec<MaterialConsumption>,
    performance: Vec<SupplierPerformance>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(mut self, po: PurchaseOrder) -> Self {
        self.orders.push(po);
        self
    }

    pub fn receipt(mut self, gr: GoodsReceipt) -> Self {
        self.receipts.push(gr);
        self
    }

    pub fn inventory(mut self, inv: InventorySnapshot) -> Self {
        self.inventory.push(inv);
        self
    }

    pub fn consumption(mut self, row: MaterialConsumption) -> Self {
        self.consumption.push(row);
        self
    }

    pub fn performance(mut self, row: SupplierPerformance) -> Self {
        self.performance.push(row);
        self
    }

    pub fn build(self) -> Dataset {
        let mut ds = Dataset::empty();
        ds.purchase_orders = self.orders;
        ds.goods_receipts = self.receipts;
        ds.inventory = self.inventory;
        ds.consumption = self.consumption;
        ds.supplier_source = SupplierSource::from_optional(Some(self.performance));
        ds
    }
}

// ==========================================
// 场景数据
// ==========================================

/// 三家供应商 / 三种物料 / 两个产品的小型场景
///
/// - S1: 高支出, 两单均迟交且有拒收
/// - S2: 中支出, 准时
/// - S3: 低支出, 一单未收货
pub fn sample_dataset() -> Dataset {
    DatasetBuilder::new()
        .order(
            PoBuilder::new("PO1", "S1", "M1")
                .dates(date(2024, 1, 1), date(2024, 1, 10))
                .qty(100.0)
                .price(10.0)
                .status(PoStatus::Closed)
                .build(),
        )
        .order(
            PoBuilder::new("PO2", "S1", "M2")
                .dates(date(2024, 1, 5), date(2024, 1, 15))
                .qty(50.0)
                .price(10.0)
                .status(PoStatus::Closed)
                .build(),
        )
        .order(
            PoBuilder::new("PO3", "S2", "M2")
                .dates(date(2024, 1, 3), date(2024, 1, 13))
                .qty(40.0)
                .price(10.0)
                .status(PoStatus::Closed)
                .build(),
        )
        .order(
            PoBuilder::new("PO4", "S3", "M3")
                .dates(date(2024, 1, 2), date(2024, 1, 12))
                .qty(10.0)
                .price(10.0)
                .build(),
        )
        .receipt(receipt("PO1", date(2024, 1, 15), 100.0, 10.0))
        .receipt(receipt("PO2", date(2024, 1, 25), 50.0, 5.0))
        .receipt(receipt("PO3", date(2024, 1, 10), 40.0, 0.0))
        .inventory(InventoryBuilder::new("M1").stock(20.0).safety_stock(50.0).daily_consumption(10.0).build())
        .inventory(InventoryBuilder::new("M2").stock(300.0).safety_stock(50.0).daily_consumption(10.0).build())
        .inventory(InventoryBuilder::new("M3").stock(100.0).safety_stock(10.0).daily_consumption(0.0).build())
        .consumption(consumption("M1", "P1", date(2024, 1, 20), 10.0))
        .consumption(consumption("M1", "P1", date(2024, 1, 21), 14.0))
        .consumption(consumption("M1", "P2", date(2024, 1, 20), 6.0))
        .consumption(consumption("M2", "P1", date(2024, 1, 20), 8.0))
        .consumption(consumption("M2", "P2", date(2024, 1, 21), 12.0))
        .build()
}
