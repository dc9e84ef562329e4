//! Dashboard outcome-rule resolution.
//!
//! Rules are evaluated against the final total score in declaration
//! order; the first match wins and no further rules are considered, so a
//! catch-all rule belongs at the end of the list.

use crate::model::{Rule, RuleLogic, RuleOperator};

impl RuleLogic {
    /// Whether this predicate is satisfied by the given total score.
    /// Unrecognized operators never match.
    pub fn matches(&self, total: i64) -> bool {
        let total = total as f64;
        match self.operator {
            RuleOperator::Gt => total > self.value,
            RuleOperator::Lt => total < self.value,
            RuleOperator::Gte => total >= self.value,
            RuleOperator::Lte => total <= self.value,
            RuleOperator::Eq => total == self.value,
            RuleOperator::Between => self.min <= total && total <= self.max,
            RuleOperator::Unknown => false,
        }
    }
}

/// Resolve the first rule (in list order) matching the total score.
pub fn resolve_matching_rule(total: i64, rules: &[Rule]) -> Option<&Rule> {
    rules.iter().find(|rule| rule.logic.matches(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(operator: RuleOperator, value: f64, min: f64, max: f64, label: &str) -> Rule {
        Rule {
            condition_text: label.to_string(),
            logic: RuleLogic {
                operator,
                value,
                min,
                max,
            },
            message: format!("matched {label}"),
            style: Default::default(),
        }
    }

    #[test]
    fn operators_compare_as_expected() {
        assert!(rule(RuleOperator::Gt, 50.0, 0.0, 0.0, "gt").logic.matches(51));
        assert!(!rule(RuleOperator::Gt, 50.0, 0.0, 0.0, "gt").logic.matches(50));
        assert!(rule(RuleOperator::Gte, 50.0, 0.0, 0.0, "gte").logic.matches(50));
        assert!(rule(RuleOperator::Lt, 50.0, 0.0, 0.0, "lt").logic.matches(49));
        assert!(rule(RuleOperator::Lte, 50.0, 0.0, 0.0, "lte").logic.matches(50));
        assert!(rule(RuleOperator::Eq, 50.0, 0.0, 0.0, "eq").logic.matches(50));
        assert!(!rule(RuleOperator::Eq, 50.0, 0.0, 0.0, "eq").logic.matches(51));
    }

    #[test]
    fn between_is_inclusive_on_both_ends() {
        let r = rule(RuleOperator::Between, 0.0, 40.0, 60.0, "mid");
        assert!(r.logic.matches(40));
        assert!(r.logic.matches(60));
        assert!(!r.logic.matches(39));
        assert!(!r.logic.matches(61));
    }

    #[test]
    fn first_match_wins_in_declaration_order() {
        let rules = vec![
            rule(RuleOperator::Gte, 50.0, 0.0, 0.0, "high"),
            rule(RuleOperator::Lt, 50.0, 0.0, 0.0, "low"),
        ];

        // 50 satisfies the first rule; the second is never evaluated.
        let matched = resolve_matching_rule(50, &rules).unwrap();
        assert_eq!(matched.condition_text, "high");

        let matched = resolve_matching_rule(12, &rules).unwrap();
        assert_eq!(matched.condition_text, "low");
    }

    #[test]
    fn overlapping_rules_resolve_to_the_earliest() {
        let rules = vec![
            rule(RuleOperator::Between, 0.0, 0.0, 100.0, "broad"),
            rule(RuleOperator::Eq, 75.0, 0.0, 0.0, "exact"),
        ];
        assert_eq!(
            resolve_matching_rule(75, &rules).unwrap().condition_text,
            "broad"
        );
    }

    #[test]
    fn no_match_returns_none() {
        let rules = vec![rule(RuleOperator::Gt, 90.0, 0.0, 0.0, "elite")];
        assert!(resolve_matching_rule(10, &rules).is_none());
        assert!(resolve_matching_rule(0, &[]).is_none());
    }

    #[test]
    fn unknown_operator_never_matches() {
        let rules = vec![
            rule(RuleOperator::Unknown, 0.0, 0.0, 0.0, "mystery"),
            rule(RuleOperator::Lte, 100.0, 0.0, 0.0, "fallback"),
        ];
        assert_eq!(
            resolve_matching_rule(10, &rules).unwrap().condition_text,
            "fallback"
        );
    }
}
