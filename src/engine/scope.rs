// ==========================================
// FMCG 采购风险分析 - 筛选范围
// ==========================================
// 职责: 按供应商 / 物料 / 产品筛选基础表
// 说明: 筛选结果是新值,基础表保持不变
// ==========================================

use crate::domain::records::{Dataset, SupplierSource};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// 分析范围 (None 表示不限)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisScope {
    pub suppliers: Option<BTreeSet<String>>,
    pub materials: Option<BTreeSet<String>>,
    pub products: Option<BTreeSet<String>>,
}

fn allows(filter: &Option<BTreeSet<String>>, value: &str) -> bool {
    filter.as_ref().map_or(true, |set| set.contains(value))
}

impl AnalysisScope {
    /// 全量范围
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_suppliers<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suppliers = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_materials<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materials = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_products<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// 应用范围
    ///
    /// # 规则
    /// - PO: 供应商 + 物料
    /// - GR: 仅保留属于筛选后 PO 的收货
    /// - 库存: 物料
    /// - 消耗: 物料 + 产品
    /// - 供应商绩效: 供应商 (筛空后仍保持绩效模式)
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        let purchase_orders: Vec<_> = dataset
            .purchase_orders
            .iter()
            .filter(|po| allows(&self.suppliers, &po.supplier_id))
            .filter(|po| allows(&self.materials, &po.material_id))
            .cloned()
            .collect();

        let po_numbers: HashSet<&str> = purchase_orders
            .iter()
            .map(|po| po.po_number.as_str())
            .collect();
        let goods_receipts = dataset
            .goods_receipts
            .iter()
            .filter(|gr| po_numbers.contains(gr.po_number.as_str()))
            .cloned()
            .collect();

        let inventory = dataset
            .inventory
            .iter()
            .filter(|inv| allows(&self.materials, &inv.material_id))
            .cloned()
            .collect();

        let consumption = dataset
            .consumption
            .iter()
            .filter(|c| allows(&self.materials, &c.material_id))
            .filter(|c| allows(&self.products, &c.product_id))
            .cloned()
            .collect();

        let supplier_source = match &dataset.supplier_source {
            SupplierSource::Derived => SupplierSource::Derived,
            SupplierSource::Table(rows) => SupplierSource::Table(
                rows.iter()
                    .filter(|r| allows(&self.suppliers, &r.supplier_id))
                    .cloned()
                    .collect(),
            ),
        };

        Dataset {
            purchase_orders,
            goods_receipts,
            inventory,
            consumption,
            supplier_source,
        }
    }
}
