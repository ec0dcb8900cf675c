// ==========================================
// FMCG 采购风险分析 - 数据质量校验器实现
// ==========================================
// 职责: 记录级不变量校验 + DQ 报告
// 红线: DQ 问题只告警,不阻断分析
// ==========================================

use crate::domain::records::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// DQ 等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Warning, // 违反记录不变量
    Info,    // 提示 (如孤立收货)
}

/// 单条 DQ 违规
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub sheet: String,
    pub key: String,
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

pub struct DqValidator;

impl DqValidator {
    /// 校验全部基础表
    pub fn validate(&self, dataset: &Dataset) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        violations.extend(self.validate_purchase_orders(dataset));
        violations.extend(self.validate_goods_receipts(dataset));
        violations.extend(self.validate_inventory(dataset));
        violations.extend(self.validate_consumption(dataset));
        violations
    }

    /// 校验 PO: 主键唯一 / 下单日 <= 交期 / 数量价格非负
    fn validate_purchase_orders(&self, dataset: &Dataset) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for po in &dataset.purchase_orders {
            if !seen.insert(po.po_number.as_str()) {
                violations.push(warning(
                    "Purchase_Order",
                    &po.po_number,
                    "po_number",
                    "重复 PO 号".to_string(),
                ));
            }
            if po.po_date > po.expected_delivery_date {
                violations.push(warning(
                    "Purchase_Order",
                    &po.po_number,
                    "expected_delivery_date",
                    format!(
                        "约定交期 {} 早于下单日 {}",
                        po.expected_delivery_date, po.po_date
                    ),
                ));
            }
            if po.ordered_qty < 0.0 || po.unit_price < 0.0 {
                violations.push(warning(
                    "Purchase_Order",
                    &po.po_number,
                    "ordered_qty,unit_price",
                    "数量或单价为负数".to_string(),
                ));
            }
        }

        violations
    }

    /// 校验 GR: 拒收 <= 收货 / 外键存在
    fn validate_goods_receipts(&self, dataset: &Dataset) -> Vec<DqViolation> {
        let po_numbers: HashSet<&str> = dataset
            .purchase_orders
            .iter()
            .map(|po| po.po_number.as_str())
            .collect();

        let mut violations = Vec::new();
        for gr in &dataset.goods_receipts {
            if gr.rejected_qty > gr.received_qty {
                violations.push(warning(
                    "Goods_Receipt",
                    &gr.po_number,
                    "rejected_qty",
                    format!("拒收数量 {} 大于收货数量 {}", gr.rejected_qty, gr.received_qty),
                ));
            }
            if !po_numbers.contains(gr.po_number.as_str()) {
                violations.push(DqViolation {
                    sheet: "Goods_Receipt".to_string(),
                    key: gr.po_number.clone(),
                    level: DqLevel::Info,
                    field: "po_number".to_string(),
                    message: "收货记录无对应 PO".to_string(),
                });
            }
        }
        violations
    }

    /// 校验库存: 库存与日耗非负
    fn validate_inventory(&self, dataset: &Dataset) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        for inv in &dataset.inventory {
            if inv.stock_on_hand < 0.0 {
                violations.push(warning(
                    "Inventory",
                    &inv.material_id,
                    "stock_on_hand",
                    format!("库存为负数: {}", inv.stock_on_hand),
                ));
            }
            if inv.daily_consumption < 0.0 {
                violations.push(warning(
                    "Inventory",
                    &inv.material_id,
                    "daily_consumption",
                    format!("日耗为负数: {}", inv.daily_consumption),
                ));
            }
        }
        violations
    }

    fn validate_consumption(&self, dataset: &Dataset) -> Vec<DqViolation> {
        dataset
            .consumption
            .iter()
            .filter(|c| c.consumed_qty < 0.0)
            .map(|c| {
                warning(
                    "Material_Consumption",
                    &format!("{}/{}", c.material_id, c.product_id),
                    "consumed_qty",
                    format!("消耗量为负数: {}", c.consumed_qty),
                )
            })
            .collect()
    }
}

fn warning(sheet: &str, key: &str, field: &str, message: String) -> DqViolation {
    DqViolation {
        sheet: sheet.to_string(),
        key: key.to_string(),
        level: DqLevel::Warning,
        field: field.to_string(),
        message,
    }
}
