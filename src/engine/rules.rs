// ==========================================
// FMCG 采购风险分析 - 规则引擎
// ==========================================
// 职责: 有序规则表 (predicate → outcome) + 建议动作目录
// 红线: 规则按固定优先级求值,首个命中即返回,必须有默认结果
// ==========================================

use crate::domain::insight::{ActionCategory, RecommendedAction};
use crate::domain::types::{RiskLevel, SupplierSegment};

// ==========================================
// 通用规则表
// ==========================================

/// 单条规则
pub struct Rule<C, O> {
    pub name: &'static str,
    pub predicate: fn(&C) -> bool,
    pub outcome: O,
}

/// 有序规则表 (带强制默认项)
pub struct RuleTable<C: 'static, O: 'static> {
    pub rules: &'static [Rule<C, O>],
    pub default_name: &'static str,
    pub default: O,
}

/// 规则命中结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<O> {
    pub rule: &'static str,
    pub outcome: O,
}

impl<C: 'static, O: Copy + 'static> RuleTable<C, O> {
    /// 按顺序求值,首个命中即返回; 均未命中时返回默认项
    pub fn evaluate(&self, ctx: &C) -> RuleMatch<O> {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(ctx))
            .map(|rule| RuleMatch {
                rule: rule.name,
                outcome: rule.outcome,
            })
            .unwrap_or(RuleMatch {
                rule: self.default_name,
                outcome: self.default,
            })
    }
}

// ==========================================
// 供应商分群规则
// ==========================================

/// 分群输入 (阈值随评分策略变化)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInput {
    pub dependency: f64,
    pub risk_score: f64,
    pub dependency_threshold: f64,
    pub risk_threshold: f64,
}

impl SegmentInput {
    fn high_dependency(&self) -> bool {
        self.dependency > self.dependency_threshold
    }

    fn low_risk(&self) -> bool {
        self.risk_score < self.risk_threshold
    }
}

pub static SEGMENT_RULES: RuleTable<SegmentInput, SupplierSegment> = RuleTable {
    rules: &[
        Rule {
            name: "HIGH_DEPENDENCY_LOW_RISK",
            predicate: |c: &SegmentInput| c.high_dependency() && c.low_risk(),
            outcome: SupplierSegment::Strategic,
        },
        Rule {
            name: "HIGH_DEPENDENCY_HIGH_RISK",
            predicate: |c: &SegmentInput| c.high_dependency() && !c.low_risk(),
            outcome: SupplierSegment::Bottleneck,
        },
        Rule {
            name: "LOW_DEPENDENCY_LOW_RISK",
            predicate: |c: &SegmentInput| !c.high_dependency() && c.low_risk(),
            outcome: SupplierSegment::Leverage,
        },
    ],
    default_name: "DEFAULT",
    default: SupplierSegment::Routine,
};

/// 供应商分群
pub fn classify_segment(input: &SegmentInput) -> SupplierSegment {
    SEGMENT_RULES.evaluate(input).outcome
}

/// 分群 → 建议动作类别 (Leverage / Routine 无动作)
pub static SEGMENT_ACTION_RULES: RuleTable<SupplierSegment, Option<ActionCategory>> = RuleTable {
    rules: &[
        Rule {
            name: "BOTTLENECK",
            predicate: |s: &SupplierSegment| *s == SupplierSegment::Bottleneck,
            outcome: Some(ActionCategory::BottleneckSupplier),
        },
        Rule {
            name: "STRATEGIC",
            predicate: |s: &SupplierSegment| *s == SupplierSegment::Strategic,
            outcome: Some(ActionCategory::StrategicSupplier),
        },
    ],
    default_name: "NO_ACTION",
    default: None,
};

// ==========================================
// 库存动作规则
// ==========================================

/// 库存动作输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryActionInput {
    pub risk_score: f64,
    pub days_of_inventory: Option<f64>,
    pub high_risk_threshold: f64,
    pub target_days_of_inventory: f64,
}

/// 高风险优先; 其次 DOI 低于目标; 否则无动作
pub static INVENTORY_ACTION_RULES: RuleTable<InventoryActionInput, Option<ActionCategory>> =
    RuleTable {
        rules: &[
            Rule {
                name: "HIGH_INVENTORY_RISK",
                predicate: |c: &InventoryActionInput| c.risk_score > c.high_risk_threshold,
                outcome: Some(ActionCategory::HighInventoryRisk),
            },
            Rule {
                name: "BELOW_DOI_TARGET",
                predicate: |c: &InventoryActionInput| {
                    c.days_of_inventory
                        .map_or(false, |doi| doi < c.target_days_of_inventory)
                },
                outcome: Some(ActionCategory::BelowDoiTarget),
            },
        ],
        default_name: "NO_ACTION",
        default: None,
    };

// ==========================================
// 建议动作目录 (静态查表)
// ==========================================

/// 动作目录条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    pub category: ActionCategory,
    pub risk_level: RiskLevel,
    pub area: &'static str,
    pub issue: &'static str,
    pub action: &'static str,
}

/// 类别 → (等级, 领域, 问题, 动作)
pub fn action_spec(category: ActionCategory) -> ActionSpec {
    let (risk_level, area, issue, action) = match category {
        ActionCategory::BottleneckSupplier => (
            RiskLevel::High,
            "Supplier Management",
            "Bottleneck Supplier",
            "Develop alternative supplier / renegotiate SLA",
        ),
        ActionCategory::StrategicSupplier => (
            RiskLevel::Low,
            "Supplier Management",
            "Strategic Supplier",
            "Long-term partnership & volume commitment",
        ),
        ActionCategory::HighInventoryRisk => (
            RiskLevel::High,
            "Inventory Control",
            "High Inventory Risk",
            "Increase safety stock / expedite PO",
        ),
        ActionCategory::BelowDoiTarget => (
            RiskLevel::Medium,
            "Inventory Control",
            "Days of Inventory Below Target",
            "Review reorder point",
        ),
        ActionCategory::OverdueOpenPo => (
            RiskLevel::High,
            "PO Control",
            "Overdue Open PO",
            "Follow up supplier and expedite delivery",
        ),
        ActionCategory::HighLateRateSupplier => (
            RiskLevel::High,
            "Supplier Management",
            "High Late Rate",
            "Review SLA and evaluate supplier capacity",
        ),
        ActionCategory::ProductionStockout => (
            RiskLevel::High,
            "Production Continuity",
            "Stockout Within Short Horizon",
            "Expedite PO, increase safety stock, or activate alternative supplier",
        ),
    };

    ActionSpec {
        category,
        risk_level,
        area,
        issue,
        action,
    }
}

/// 完整动作目录
pub fn action_catalog() -> Vec<ActionSpec> {
    ActionCategory::ALL.iter().map(|c| action_spec(*c)).collect()
}

/// 按类别生成建议动作
pub fn recommend(category: ActionCategory, subject: impl Into<String>) -> RecommendedAction {
    let spec = action_spec(category);
    RecommendedAction {
        subject: subject.into(),
        category,
        area: spec.area.to_string(),
        risk_level: spec.risk_level,
        issue: spec.issue.to_string(),
        action: spec.action.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(dependency: f64, risk_score: f64) -> SegmentInput {
        SegmentInput {
            dependency,
            risk_score,
            dependency_threshold: 0.15,
            risk_threshold: 0.2,
        }
    }

    #[test]
    fn test_segment_quadrants() {
        assert_eq!(classify_segment(&input(0.3, 0.1)), SupplierSegment::Strategic);
        assert_eq!(classify_segment(&input(0.3, 0.5)), SupplierSegment::Bottleneck);
        assert_eq!(classify_segment(&input(0.1, 0.1)), SupplierSegment::Leverage);
        assert_eq!(classify_segment(&input(0.1, 0.5)), SupplierSegment::Routine);
    }

    #[test]
    fn test_segment_boundaries() {
        // dependency 恰好等于阈值 → 低依赖; risk 恰好等于阈值 → 高风险
        assert_eq!(classify_segment(&input(0.15, 0.2)), SupplierSegment::Routine);
        assert_eq!(classify_segment(&input(0.15, 0.19)), SupplierSegment::Leverage);
        assert_eq!(classify_segment(&input(0.16, 0.2)), SupplierSegment::Bottleneck);
    }

    #[test]
    fn test_segment_is_total() {
        let grid = [0.0, 0.1, 0.15, 0.2, 0.5, 1.0];
        for d in grid {
            for r in grid {
                let m = SEGMENT_RULES.evaluate(&input(d, r));
                let hits = SEGMENT_RULES
                    .rules
                    .iter()
                    .filter(|rule| (rule.predicate)(&input(d, r)))
                    .count();
                assert!(hits <= 1);
                assert!(SupplierSegment::ALL.contains(&m.outcome));
            }
        }
    }

    #[test]
    fn test_segment_actions() {
        assert_eq!(
            SEGMENT_ACTION_RULES.evaluate(&SupplierSegment::Bottleneck).outcome,
            Some(ActionCategory::BottleneckSupplier)
        );
        assert_eq!(
            SEGMENT_ACTION_RULES.evaluate(&SupplierSegment::Leverage).outcome,
            None
        );
        assert_eq!(
            SEGMENT_ACTION_RULES.evaluate(&SupplierSegment::Routine).rule,
            "NO_ACTION"
        );
    }

    #[test]
    fn test_inventory_action_priority() {
        let input = |score: f64, doi: Option<f64>| InventoryActionInput {
            risk_score: score,
            days_of_inventory: doi,
            high_risk_threshold: 0.6,
            target_days_of_inventory: 14.0,
        };
        assert_eq!(
            INVENTORY_ACTION_RULES.evaluate(&input(0.9, Some(3.0))).outcome,
            Some(ActionCategory::HighInventoryRisk)
        );
        assert_eq!(
            INVENTORY_ACTION_RULES.evaluate(&input(0.3, Some(3.0))).outcome,
            Some(ActionCategory::BelowDoiTarget)
        );
        assert_eq!(INVENTORY_ACTION_RULES.evaluate(&input(0.3, None)).outcome, None);
        assert_eq!(INVENTORY_ACTION_RULES.evaluate(&input(0.6, Some(14.0))).outcome, None);
    }

    #[test]
    fn test_action_catalog_levels() {
        let catalog = action_catalog();
        assert_eq!(catalog.len(), ActionCategory::ALL.len());
        assert_eq!(
            action_spec(ActionCategory::BottleneckSupplier).risk_level,
            RiskLevel::High
        );
        assert_eq!(
            action_spec(ActionCategory::StrategicSupplier).risk_level,
            RiskLevel::Low
        );
        assert_eq!(
            action_spec(ActionCategory::BelowDoiTarget).risk_level,
            RiskLevel::Medium
        );
        assert!(catalog.iter().all(|s| !s.action.is_empty()));
    }

    #[test]
    fn test_recommend_copies_catalog_text() {
        let action = recommend(ActionCategory::OverdueOpenPo, "PO-9");
        assert_eq!(action.subject, "PO-9");
        assert_eq!(action.area, "PO Control");
        assert_eq!(action.action, "Follow up supplier and expedite delivery");
    }
}
