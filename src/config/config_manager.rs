// ==========================================
// FMCG 采购风险分析 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: JSON 对象 (key → 字符串值),缺省项回落到阈值常量
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::thresholds::RiskThresholds;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    overrides: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 无覆写 (全部使用默认阈值)
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件加载覆写
    ///
    /// # 参数
    /// - path: 配置文件路径 (内容为 `{"key": "value"}`)
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&raw)
    }

    /// 从 JSON 字符串加载覆写
    ///
    /// 说明: 值允许写成字符串或数字,统一按字符串保存
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let object = value
            .as_object()
            .ok_or_else(|| ConfigError::MalformedJson("顶层必须是对象".to_string()))?;

        let mut overrides = BTreeMap::new();
        for (key, v) in object {
            if !config_keys::ALL.contains(&key.as_str()) {
                return Err(ConfigError::UnknownKey(key.clone()));
            }
            let text = match v {
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            };
            overrides.insert(key.clone(), text);
        }

        tracing::debug!(count = overrides.len(), "配置覆写已加载");
        Ok(Self { overrides })
    }

    /// 读取配置值（覆写优先）
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.overrides.get(key).map(|s| s.as_str())
    }

    /// 设置单项覆写
    pub fn set_config_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        if !config_keys::ALL.contains(&key) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        self.overrides.insert(key.to_string(), value.trim().to_string());
        Ok(())
    }

    fn get_or<T: FromStr>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key) {
            None => Ok(default),
            Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::ConfigValueError {
                key: key.to_string(),
                value: raw.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// 比例类配置必须落在 [0, 1]
    fn get_ratio_or(&self, key: &str, default: f64) -> ConfigResult<f64> {
        let v = self.get_or(key, default)?;
        if !(0.0..=1.0).contains(&v) {
            return Err(ConfigError::ConfigValueError {
                key: key.to_string(),
                value: v.to_string(),
                message: "必须位于 [0, 1]".to_string(),
            });
        }
        Ok(v)
    }

    /// 天数 / 金额类配置必须非负
    fn get_non_negative_or(&self, key: &str, default: f64) -> ConfigResult<f64> {
        let v = self.get_or(key, default)?;
        if v < 0.0 || !v.is_finite() {
            return Err(ConfigError::ConfigValueError {
                key: key.to_string(),
                value: v.to_string(),
                message: "必须为非负有限数".to_string(),
            });
        }
        Ok(v)
    }

    /// 生成生效阈值
    pub fn thresholds(&self) -> ConfigResult<RiskThresholds> {
        let d = RiskThresholds::default();
        Ok(RiskThresholds {
            target_on_time_delivery_rate: self
                .get_ratio_or(config_keys::TARGET_ON_TIME_DELIVERY_RATE, d.target_on_time_delivery_rate)?,
            target_lead_time_days: self
                .get_non_negative_or(config_keys::TARGET_LEAD_TIME_DAYS, d.target_lead_time_days)?,
            target_stockout_ratio: self
                .get_ratio_or(config_keys::TARGET_STOCKOUT_RATIO, d.target_stockout_ratio)?,
            target_days_of_inventory: self
                .get_non_negative_or(config_keys::TARGET_DAYS_OF_INVENTORY, d.target_days_of_inventory)?,
            short_horizon_stockout_days: self.get_non_negative_or(
                config_keys::SHORT_HORIZON_STOCKOUT_DAYS,
                d.short_horizon_stockout_days,
            )?,
            assumed_unit_revenue: self
                .get_non_negative_or(config_keys::ASSUMED_UNIT_REVENUE, d.assumed_unit_revenue)?,
            supplier_dependency_threshold: self.get_ratio_or(
                config_keys::SUPPLIER_DEPENDENCY_THRESHOLD,
                d.supplier_dependency_threshold,
            )?,
            supplier_segment_risk_derived: self.get_ratio_or(
                config_keys::SUPPLIER_SEGMENT_RISK_DERIVED,
                d.supplier_segment_risk_derived,
            )?,
            supplier_segment_risk_performance: self.get_ratio_or(
                config_keys::SUPPLIER_SEGMENT_RISK_PERFORMANCE,
                d.supplier_segment_risk_performance,
            )?,
            supplier_high_risk_score: self
                .get_ratio_or(config_keys::SUPPLIER_HIGH_RISK_SCORE, d.supplier_high_risk_score)?,
            inventory_high_risk_score: self
                .get_ratio_or(config_keys::INVENTORY_HIGH_RISK_SCORE, d.inventory_high_risk_score)?,
            production_high_impact_score: self.get_non_negative_or(
                config_keys::PRODUCTION_HIGH_IMPACT_SCORE,
                d.production_high_impact_score,
            )?,
            po_late_rate_alert: self
                .get_ratio_or(config_keys::PO_LATE_RATE_ALERT, d.po_late_rate_alert)?,
            supplier_late_rate_action: self
                .get_ratio_or(config_keys::SUPPLIER_LATE_RATE_ACTION, d.supplier_late_rate_action)?,
            top_n: self.get_or(config_keys::TOP_N, d.top_n)?,
        })
    }

    /// 获取所有生效配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 报告输出时附带口径,便于对账
    pub fn snapshot(&self) -> ConfigResult<String> {
        let thresholds = self.thresholds()?;
        let value = json!({
            "overrides": self.overrides,
            "effective": thresholds,
        });
        Ok(serde_json::to_string(&value)?)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 目标值
    pub const TARGET_ON_TIME_DELIVERY_RATE: &str = "target_on_time_delivery_rate";
    pub const TARGET_LEAD_TIME_DAYS: &str = "target_lead_time_days";
    pub const TARGET_STOCKOUT_RATIO: &str = "target_stockout_ratio";
    pub const TARGET_DAYS_OF_INVENTORY: &str = "target_days_of_inventory";

    // 生产影响
    pub const SHORT_HORIZON_STOCKOUT_DAYS: &str = "short_horizon_stockout_days";
    pub const ASSUMED_UNIT_REVENUE: &str = "assumed_unit_revenue";
    pub const PRODUCTION_HIGH_IMPACT_SCORE: &str = "production_high_impact_score";

    // 供应商
    pub const SUPPLIER_DEPENDENCY_THRESHOLD: &str = "supplier_dependency_threshold";
    pub const SUPPLIER_SEGMENT_RISK_DERIVED: &str = "supplier_segment_risk_derived";
    pub const SUPPLIER_SEGMENT_RISK_PERFORMANCE: &str = "supplier_segment_risk_performance";
    pub const SUPPLIER_HIGH_RISK_SCORE: &str = "supplier_high_risk_score";

    // 库存
    pub const INVENTORY_HIGH_RISK_SCORE: &str = "inventory_high_risk_score";

    // PO 交期
    pub const PO_LATE_RATE_ALERT: &str = "po_late_rate_alert";
    pub const SUPPLIER_LATE_RATE_ACTION: &str = "supplier_late_rate_action";

    // 展示
    pub const TOP_N: &str = "top_n";

    pub const ALL: [&str; 15] = [
        TARGET_ON_TIME_DELIVERY_RATE,
        TARGET_LEAD_TIME_DAYS,
        TARGET_STOCKOUT_RATIO,
        TARGET_DAYS_OF_INVENTORY,
        SHORT_HORIZON_STOCKOUT_DAYS,
        ASSUMED_UNIT_REVENUE,
        PRODUCTION_HIGH_IMPACT_SCORE,
        SUPPLIER_DEPENDENCY_THRESHOLD,
        SUPPLIER_SEGMENT_RISK_DERIVED,
        SUPPLIER_SEGMENT_RISK_PERFORMANCE,
        SUPPLIER_HIGH_RISK_SCORE,
        INVENTORY_HIGH_RISK_SCORE,
        PO_LATE_RATE_ALERT,
        SUPPLIER_LATE_RATE_ACTION,
        TOP_N,
    ];
}
