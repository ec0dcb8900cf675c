// ==========================================
// FMCG 采购风险分析 - 订单 / 收货关联
// ==========================================
// 职责: PO 左关联 GR + 库存按物料取最新快照
// 红线: 无收货的订单保留 (未结订单),不丢弃
// ==========================================

use crate::domain::records::{GoodsReceipt, InventorySnapshot, PurchaseOrder};
use chrono::NaiveDate;
use std::collections::HashMap;

/// 同一 PO 的收货汇总
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiptSummary {
    pub gr_date: NaiveDate, // 最晚收货日
    pub received_qty: f64,
    pub rejected_qty: f64,
}

/// PO + 收货汇总
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedOrder<'a> {
    pub order: &'a PurchaseOrder,
    pub receipt: Option<ReceiptSummary>,
}

impl<'a> JoinedOrder<'a> {
    pub fn gr_date(&self) -> Option<NaiveDate> {
        self.receipt.map(|r| r.gr_date)
    }

    /// 交期天数 (gr_date − po_date); 未收货为 None
    pub fn lead_time(&self) -> Option<i64> {
        self.gr_date()
            .map(|gr| (gr - self.order.po_date).num_days())
    }

    /// 已收货且晚于约定交期
    pub fn is_late(&self) -> bool {
        self.gr_date()
            .map_or(false, |gr| gr > self.order.expected_delivery_date)
    }

    pub fn received_qty(&self) -> f64 {
        self.receipt.map_or(0.0, |r| r.received_qty)
    }

    pub fn rejected_qty(&self) -> f64 {
        self.receipt.map_or(0.0, |r| r.rejected_qty)
    }
}

/// 按 po_number 汇总收货 (一对多)
pub fn summarize_receipts(receipts: &[GoodsReceipt]) -> HashMap<&str, ReceiptSummary> {
    let mut summaries: HashMap<&str, ReceiptSummary> = HashMap::new();
    for gr in receipts {
        summaries
            .entry(gr.po_number.as_str())
            .and_modify(|s| {
                if gr.gr_date > s.gr_date {
                    s.gr_date = gr.gr_date;
                }
                s.received_qty += gr.received_qty;
                s.rejected_qty += gr.rejected_qty;
            })
            .or_insert(ReceiptSummary {
                gr_date: gr.gr_date,
                received_qty: gr.received_qty,
                rejected_qty: gr.rejected_qty,
            });
    }
    summaries
}

/// PO 左关联 GR (保持 PO 输入顺序)
pub fn join_orders<'a>(
    orders: &'a [PurchaseOrder],
    receipts: &[GoodsReceipt],
) -> Vec<JoinedOrder<'a>> {
    let summaries = summarize_receipts(receipts);
    orders
        .iter()
        .map(|order| JoinedOrder {
            order,
            receipt: summaries.get(order.po_number.as_str()).copied(),
        })
        .collect()
}

/// 每个物料的最新库存快照
///
/// 按 snapshot_date 取最新; 日期相同 (或均缺失) 时取输入中靠后的一行
pub fn latest_inventory(inventory: &[InventorySnapshot]) -> Vec<&InventorySnapshot> {
    let mut order: Vec<&str> = Vec::new();
    let mut latest: HashMap<&str, &InventorySnapshot> = HashMap::new();

    for inv in inventory {
        match latest.get(inv.material_id.as_str()) {
            Some(current) if inv.snapshot_date < current.snapshot_date => {}
            Some(_) => {
                latest.insert(inv.material_id.as_str(), inv);
            }
            None => {
                order.push(inv.material_id.as_str());
                latest.insert(inv.material_id.as_str(), inv);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| latest.get(id).copied())
        .collect()
}
