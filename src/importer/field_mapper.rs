// ==========================================
// FMCG 采购风险分析 - 字段映射器实现
// ==========================================
// 阶段 1: 源列 → 标准字段映射 + 类型转换
// 日期: 统一解析为 NaiveDate (支持 Excel 序列号)
// ==========================================

use crate::domain::records::{
    GoodsReceipt, InventorySnapshot, MaterialConsumption, PurchaseOrder, SupplierPerformance,
};
use crate::domain::types::PoStatus;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::{Duration, NaiveDate, NaiveDateTime};

// Excel 1900 日期系统的零点 (含 1900 闰年缺陷补偿)
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
// 合理序列号范围: 1900-01-01 .. 9999-12-31
const EXCEL_SERIAL_MIN: f64 = 1.0;
const EXCEL_SERIAL_MAX: f64 = 2_958_465.0;

pub struct FieldMapper {
    sheet: &'static str,
}

impl FieldMapper {
    pub fn new(sheet: &'static str) -> Self {
        Self { sheet }
    }

    // ==========================================
    // 各表映射
    // ==========================================

    pub fn map_purchase_order(&self, row: &RawRow) -> ImportResult<PurchaseOrder> {
        let supplier_id = self.required_string(row, "supplier_id")?;
        let material_id = self.required_string(row, "material_id")?;
        Ok(PurchaseOrder {
            po_number: self.required_string(row, "po_number")?,
            supplier_name: self
                .get_string(row, "supplier_name")
                .unwrap_or_else(|| supplier_id.clone()),
            supplier_id,
            material_name: self
                .get_string(row, "material_name")
                .unwrap_or_else(|| material_id.clone()),
            material_id,
            po_date: self.required_date(row, "po_date")?,
            expected_delivery_date: self.required_date(row, "expected_delivery_date")?,
            ordered_qty: self.required_f64(row, "ordered_qty")?,
            unit_price: self.required_f64(row, "unit_price")?,
            po_status: self
                .get_string(row, "po_status")
                .map(|s| PoStatus::parse(&s))
                .unwrap_or(PoStatus::Unknown),
        })
    }

    pub fn map_goods_receipt(&self, row: &RawRow) -> ImportResult<GoodsReceipt> {
        Ok(GoodsReceipt {
            po_number: self.required_string(row, "po_number")?,
            gr_date: self.required_date(row, "gr_date")?,
            received_qty: self.required_f64(row, "received_qty")?,
            rejected_qty: self.parse_f64(row, "rejected_qty")?.unwrap_or(0.0),
        })
    }

    pub fn map_inventory(&self, row: &RawRow) -> ImportResult<InventorySnapshot> {
        let material_id = self.required_string(row, "material_id")?;
        Ok(InventorySnapshot {
            material_name: self
                .get_string(row, "material_name")
                .unwrap_or_else(|| material_id.clone()),
            material_id,
            stock_on_hand: self.required_f64(row, "stock_on_hand")?,
            safety_stock: self.parse_f64(row, "safety_stock")?.unwrap_or(0.0),
            daily_consumption: self.required_f64(row, "daily_consumption")?,
            snapshot_date: self.parse_date(row, "snapshot_date")?,
        })
    }

    pub fn map_consumption(&self, row: &RawRow) -> ImportResult<MaterialConsumption> {
        let material_id = self.required_string(row, "material_id")?;
        let product_id = self.required_string(row, "product_id")?;
        Ok(MaterialConsumption {
            material_name: self
                .get_string(row, "material_name")
                .unwrap_or_else(|| material_id.clone()),
            material_id,
            product_name: self
                .get_string(row, "product_name")
                .unwrap_or_else(|| product_id.clone()),
            product_id,
            production_date: self.required_date(row, "production_date")?,
            consumed_qty: self.required_f64(row, "consumed_qty")?,
        })
    }

    pub fn map_supplier_performance(&self, row: &RawRow) -> ImportResult<SupplierPerformance> {
        Ok(SupplierPerformance {
            supplier_id: self.required_string(row, "supplier_id")?,
            on_time_delivery_rate: self.required_f64(row, "on_time_delivery_rate")?,
            avg_lead_time: self.required_f64(row, "avg_lead_time")?,
            rejection_rate: self.required_f64(row, "rejection_rate")?,
            price_variance: self.parse_f64(row, "price_variance")?.unwrap_or(0.0),
            service_level: self.parse_f64(row, "service_level")?,
        })
    }

    // ==========================================
    // 字段提取
    // ==========================================

    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        // 定义列名别名映射 (表头已标准化为小写下划线)
        let aliases: &[&str] = match key {
            "po_number" => &["po_number", "po_no", "po"],
            "gr_date" => &["gr_date", "receipt_date", "goods_receipt_date"],
            "expected_delivery_date" => &["expected_delivery_date", "delivery_date", "due_date"],
            "snapshot_date" => &["snapshot_date", "date", "inventory_date"],
            "production_date" => &["production_date", "date"],
            "po_status" => &["po_status", "status"],
            "avg_lead_time" => &["avg_lead_time", "average_lead_time"],
            _ => &[],
        };

        let candidates = std::iter::once(key).chain(aliases.iter().copied());
        for alias in candidates {
            if let Some(v) = row.values.get(alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan") {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    fn required_string(&self, row: &RawRow, key: &str) -> ImportResult<String> {
        self.get_string(row, key)
            .ok_or_else(|| ImportError::RequiredFieldMissing {
                sheet: self.sheet.to_string(),
                row: row.row_number,
                field: key.to_string(),
            })
    }

    /// 解析浮点数 (去除千分位)
    fn parse_f64(&self, row: &RawRow, key: &str) -> ImportResult<Option<f64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => {
                let cleaned: String = value.chars().filter(|c| *c != ',' && *c != '_').collect();
                cleaned
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Some)
                    .ok_or_else(|| ImportError::TypeConversionError {
                        sheet: self.sheet.to_string(),
                        row: row.row_number,
                        field: key.to_string(),
                        message: format!("无法解析为数值: {}", value),
                    })
            }
        }
    }

    fn required_f64(&self, row: &RawRow, key: &str) -> ImportResult<f64> {
        self.parse_f64(row, key)?
            .ok_or_else(|| ImportError::RequiredFieldMissing {
                sheet: self.sheet.to_string(),
                row: row.row_number,
                field: key.to_string(),
            })
    }

    /// 解析日期
    fn parse_date(&self, row: &RawRow, key: &str) -> ImportResult<Option<NaiveDate>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => parse_date_value(&value).map(Some).ok_or_else(|| {
                ImportError::DateFormatError {
                    sheet: self.sheet.to_string(),
                    row: row.row_number,
                    field: key.to_string(),
                    value,
                }
            }),
        }
    }

    fn required_date(&self, row: &RawRow, key: &str) -> ImportResult<NaiveDate> {
        self.parse_date(row, key)?
            .ok_or_else(|| ImportError::RequiredFieldMissing {
                sheet: self.sheet.to_string(),
                row: row.row_number,
                field: key.to_string(),
            })
    }
}

/// 尽力解析日期字符串
///
/// # 支持格式
/// - `%Y-%m-%d` / `%Y/%m/%d` / `%Y%m%d`
/// - `%Y-%m-%d %H:%M:%S` / `%Y-%m-%dT%H:%M:%S` (取日期部分)
/// - Excel 序列号 (如 45292 → 2024-01-01)
pub fn parse_date_value(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // 8 位纯数字已按 YYYYMMDD 处理,其余数字按 Excel 序列号换算
    let serial = s.parse::<f64>().ok()?;
    if !(EXCEL_SERIAL_MIN..=EXCEL_SERIAL_MAX).contains(&serial) {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}
