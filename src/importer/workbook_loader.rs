// ==========================================
// FMCG 采购风险分析 - 工作簿加载器
// ==========================================
// 导入流程:
// 1. 文件读取与解析 (Excel 工作簿 / CSV 目录)
// 2. 字段映射与类型转换 (日期统一解析)
// 3. 数据源模式判定 (Supplier_Performance 是否存在)
// 4. DQ 校验 (只告警)
// ==========================================

use crate::domain::records::{Dataset, SupplierSource};
use crate::domain::types::DataSourceMode;
use crate::importer::dq_validator::{DqValidator, DqViolation};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{RawRow, SheetSource, UniversalSheetSource};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

// 工作表名
pub const SHEET_PURCHASE_ORDER: &str = "Purchase_Order";
pub const SHEET_GOODS_RECEIPT: &str = "Goods_Receipt";
pub const SHEET_INVENTORY: &str = "Inventory";
pub const SHEET_MATERIAL_CONSUMPTION: &str = "Material_Consumption";
pub const SHEET_SUPPLIER_PERFORMANCE: &str = "Supplier_Performance";

/// 加载结果
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub dataset: Dataset,
    pub mode: DataSourceMode,
    pub violations: Vec<DqViolation>,
    pub elapsed_ms: u64,
}

pub struct WorkbookLoader;

impl WorkbookLoader {
    /// 从路径加载 (文件 → Excel, 目录 → CSV)
    pub fn load<P: AsRef<Path>>(&self, path: P) -> ImportResult<LoadReport> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "开始加载采购数据");
        let mut source = UniversalSheetSource::open(path)?;
        self.load_from_source(&mut source)
    }

    /// 从任意工作表数据源加载
    pub fn load_from_source<S: SheetSource>(&self, source: &mut S) -> ImportResult<LoadReport> {
        let start = Instant::now();

        let purchase_orders = map_rows(
            required_sheet(source, SHEET_PURCHASE_ORDER)?,
            &FieldMapper::new(SHEET_PURCHASE_ORDER),
            FieldMapper::map_purchase_order,
        )?;
        let goods_receipts = map_rows(
            required_sheet(source, SHEET_GOODS_RECEIPT)?,
            &FieldMapper::new(SHEET_GOODS_RECEIPT),
            FieldMapper::map_goods_receipt,
        )?;
        let inventory = map_rows(
            required_sheet(source, SHEET_INVENTORY)?,
            &FieldMapper::new(SHEET_INVENTORY),
            FieldMapper::map_inventory,
        )?;
        let consumption = map_rows(
            required_sheet(source, SHEET_MATERIAL_CONSUMPTION)?,
            &FieldMapper::new(SHEET_MATERIAL_CONSUMPTION),
            FieldMapper::map_consumption,
        )?;

        // 可选表: 缺失时回落到派生口径
        let supplier_performance = match source.read_sheet(SHEET_SUPPLIER_PERFORMANCE)? {
            Some(rows) => Some(map_rows(
                rows,
                &FieldMapper::new(SHEET_SUPPLIER_PERFORMANCE),
                FieldMapper::map_supplier_performance,
            )?),
            None => None,
        };

        let dataset = Dataset {
            purchase_orders,
            goods_receipts,
            inventory,
            consumption,
            supplier_source: SupplierSource::from_optional(supplier_performance),
        };
        let mode = dataset.mode();

        let violations = DqValidator.validate(&dataset);
        for v in &violations {
            tracing::warn!(sheet = %v.sheet, key = %v.key, field = %v.field, "DQ: {}", v.message);
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            purchase_orders = dataset.purchase_orders.len(),
            goods_receipts = dataset.goods_receipts.len(),
            inventory = dataset.inventory.len(),
            consumption = dataset.consumption.len(),
            mode = %mode,
            dq_violations = violations.len(),
            elapsed_ms,
            "采购数据加载完成"
        );

        Ok(LoadReport {
            dataset,
            mode,
            violations,
            elapsed_ms,
        })
    }
}

fn required_sheet<S: SheetSource>(source: &mut S, name: &str) -> ImportResult<Vec<RawRow>> {
    source
        .read_sheet(name)?
        .ok_or_else(|| ImportError::SheetNotFound(name.to_string()))
}

fn map_rows<T>(
    rows: Vec<RawRow>,
    mapper: &FieldMapper,
    map: fn(&FieldMapper, &RawRow) -> ImportResult<T>,
) -> ImportResult<Vec<T>> {
    rows.iter().map(|row| map(mapper, row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// 内存数据源
    struct MemorySource {
        sheets: HashMap<String, Vec<RawRow>>,
    }

    impl SheetSource for MemorySource {
        fn read_sheet(&mut self, sheet_name: &str) -> ImportResult<Option<Vec<RawRow>>> {
            Ok(self.sheets.get(sheet_name).cloned())
        }
    }

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        RawRow {
            row_number: 2,
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn base_sheets() -> HashMap<String, Vec<RawRow>> {
        let mut sheets = HashMap::new();
        sheets.insert(
            SHEET_PURCHASE_ORDER.to_string(),
            vec![raw(&[
                ("po_number", "PO1"),
                ("supplier_id", "S1"),
                ("material_id", "M1"),
                ("po_date", "2024-01-01"),
                ("expected_delivery_date", "2024-01-10"),
                ("ordered_qty", "10"),
                ("unit_price", "100"),
            ])],
        );
        sheets.insert(
            SHEET_GOODS_RECEIPT.to_string(),
            vec![raw(&[
                ("po_number", "PO1"),
                ("gr_date", "2024-01-15"),
                ("received_qty", "10"),
                ("rejected_qty", "1"),
            ])],
        );
        sheets.insert(SHEET_INVENTORY.to_string(), Vec::new());
        sheets.insert(SHEET_MATERIAL_CONSUMPTION.to_string(), Vec::new());
        sheets
    }

    #[test]
    fn test_load_without_supplier_performance_is_derived() {
        let mut source = MemorySource {
            sheets: base_sheets(),
        };
        let report = WorkbookLoader.load_from_source(&mut source).unwrap();

        assert_eq!(report.mode, DataSourceMode::Derived);
        assert_eq!(report.dataset.purchase_orders.len(), 1);
        assert_eq!(report.dataset.goods_receipts[0].rejected_qty, 1.0);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_load_with_supplier_performance() {
        let mut sheets = base_sheets();
        sheets.insert(
            SHEET_SUPPLIER_PERFORMANCE.to_string(),
            vec![raw(&[
                ("supplier_id", "S1"),
                ("on_time_delivery_rate", "0.9"),
                ("avg_lead_time", "12"),
                ("rejection_rate", "0.02"),
                ("price_variance", "-0.05"),
            ])],
        );
        let mut source = MemorySource { sheets };
        let report = WorkbookLoader.load_from_source(&mut source).unwrap();

        assert_eq!(report.mode, DataSourceMode::WithSupplierPerformance);
        assert_eq!(report.dataset.supplier_source.rows()[0].price_variance, -0.05);
    }

    #[test]
    fn test_missing_required_sheet_fails() {
        let mut sheets = base_sheets();
        sheets.remove(SHEET_INVENTORY);
        let mut source = MemorySource { sheets };

        let err = WorkbookLoader.load_from_source(&mut source).unwrap_err();
        assert!(matches!(err, ImportError::SheetNotFound(ref s) if s == SHEET_INVENTORY));
    }
}
