// ==========================================
// FMCG 采购风险分析 - 领域类型定义
// ==========================================
// 职责: 风险等级 / 供应商分群 / PO 状态 / 账龄桶 / 数据源模式
// 红线: 分群与等级是全函数,每条记录必须落入且仅落入一个取值
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 风险等级 (Risk Level)
// ==========================================
// 顺序: Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,    // 低
    Medium, // 中
    High,   // 高
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

// ==========================================
// 供应商分群 (Supplier Segment)
// ==========================================
// 依赖度 × 风险 四象限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplierSegment {
    Strategic,  // 高依赖 + 低风险
    Bottleneck, // 高依赖 + 高风险
    Leverage,   // 低依赖 + 低风险
    Routine,    // 其余
}

impl SupplierSegment {
    pub const ALL: [SupplierSegment; 4] = [
        SupplierSegment::Strategic,
        SupplierSegment::Bottleneck,
        SupplierSegment::Leverage,
        SupplierSegment::Routine,
    ];
}

impl fmt::Display for SupplierSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplierSegment::Strategic => write!(f, "Strategic"),
            SupplierSegment::Bottleneck => write!(f, "Bottleneck"),
            SupplierSegment::Leverage => write!(f, "Leverage"),
            SupplierSegment::Routine => write!(f, "Routine"),
        }
    }
}

// ==========================================
// PO 状态 (PO Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoStatus {
    Open,
    Closed,
    Cancelled,
    Unknown,
}

impl PoStatus {
    /// 从源数据字符串解析 PO 状态（宽松匹配,无法识别时为 Unknown）
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "OPEN" | "O" | "RELEASED" | "PARTIAL" => PoStatus::Open,
            "CLOSED" | "C" | "COMPLETED" | "RECEIVED" => PoStatus::Closed,
            "CANCELLED" | "CANCELED" | "X" => PoStatus::Cancelled,
            _ => PoStatus::Unknown,
        }
    }
}

impl fmt::Display for PoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoStatus::Open => write!(f, "OPEN"),
            PoStatus::Closed => write!(f, "CLOSED"),
            PoStatus::Cancelled => write!(f, "CANCELLED"),
            PoStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ==========================================
// PO 账龄桶 (Aging Bucket)
// ==========================================
// 区间: [0,7) [7,14) [14,30) [30,∞)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgingBucket {
    UpTo7Days,
    Days8To14,
    Days15To30,
    Over30Days,
}

impl AgingBucket {
    pub const ALL: [AgingBucket; 4] = [
        AgingBucket::UpTo7Days,
        AgingBucket::Days8To14,
        AgingBucket::Days15To30,
        AgingBucket::Over30Days,
    ];

    /// 展示标签
    pub fn label(&self) -> &'static str {
        match self {
            AgingBucket::UpTo7Days => "0–7 days",
            AgingBucket::Days8To14 => "8–14 days",
            AgingBucket::Days15To30 => "15–30 days",
            AgingBucket::Over30Days => ">30 days",
        }
    }
}

impl fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 数据源模式 (Data Source Mode)
// ==========================================
// 加载时一次性确定,分析器按此分支,不做分散的存在性判断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSourceMode {
    /// 仅 PO + GR,供应商指标全部派生
    Derived,
    /// 存在 Supplier_Performance 表
    WithSupplierPerformance,
}

impl DataSourceMode {
    pub fn has_supplier_performance(&self) -> bool {
        matches!(self, DataSourceMode::WithSupplierPerformance)
    }
}

impl fmt::Display for DataSourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceMode::Derived => write!(f, "DERIVED"),
            DataSourceMode::WithSupplierPerformance => write!(f, "WITH_SUPPLIER_PERFORMANCE"),
        }
    }
}

// ==========================================
// 供应商评分策略 (Supplier Scoring Strategy)
// ==========================================
// 两套权重口径并存,显式命名,不静默择一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierScoringStrategy {
    /// 0.5×迟交率 + 0.3×拒收率 + 0.2×交期归一
    DerivedPoGr,
    /// 0.4×(1−准时率) + 0.3×拒收率 + 0.2×|价格偏差| + 0.1×交期归一
    SupplierPerformance,
}

impl SupplierScoringStrategy {
    /// 按数据源模式选择默认策略
    pub fn for_mode(mode: DataSourceMode) -> Self {
        match mode {
            DataSourceMode::Derived => SupplierScoringStrategy::DerivedPoGr,
            DataSourceMode::WithSupplierPerformance => SupplierScoringStrategy::SupplierPerformance,
        }
    }
}

impl fmt::Display for SupplierScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplierScoringStrategy::DerivedPoGr => write!(f, "DERIVED_PO_GR"),
            SupplierScoringStrategy::SupplierPerformance => write!(f, "SUPPLIER_PERFORMANCE"),
        }
    }
}

// ==========================================
// 指标来源 (Metrics Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricsSource {
    PoGr,
    SupplierPerformance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
    }

    #[test]
    fn test_po_status_parse() {
        assert_eq!(PoStatus::parse("open"), PoStatus::Open);
        assert_eq!(PoStatus::parse(" Closed "), PoStatus::Closed);
        assert_eq!(PoStatus::parse("Canceled"), PoStatus::Cancelled);
        assert_eq!(PoStatus::parse("???"), PoStatus::Unknown);
    }

    #[test]
    fn test_strategy_for_mode() {
        assert_eq!(
            SupplierScoringStrategy::for_mode(DataSourceMode::Derived),
            SupplierScoringStrategy::DerivedPoGr
        );
        assert_eq!(
            SupplierScoringStrategy::for_mode(DataSourceMode::WithSupplierPerformance),
            SupplierScoringStrategy::SupplierPerformance
        );
    }

    #[test]
    fn test_aging_bucket_labels() {
        assert_eq!(AgingBucket::UpTo7Days.to_string(), "0–7 days");
        assert_eq!(AgingBucket::Over30Days.label(), ">30 days");
    }
}
