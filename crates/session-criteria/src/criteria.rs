//! 个性化分组条件
//!
//! [`PersonalisationGroupCriteria`] 是各类访客条件的统一入口：
//! 输入一段定义文本，输出访客是否满足。会话条件是其中一种实现。

use crate::config::CriteriaConfig;
use crate::error::Result;
use crate::evaluator::ConditionEvaluator;
use crate::parser::DefinitionParser;
use crate::provider::SessionProvider;
use personalisation_shared::observability::metrics::{
    CRITERIA_DEFINITION_ERRORS_TOTAL, CRITERIA_EVALUATIONS_TOTAL,
};
use tracing::{debug, instrument};

/// 访客条件接口
pub trait PersonalisationGroupCriteria: Send + Sync {
    /// 展示名称
    fn name(&self) -> &'static str;

    /// 定义中引用该条件时使用的别名
    fn alias(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// 判断当前访客是否满足定义
    fn matches_visitor(&self, definition: Option<&str>) -> Result<bool>;
}

/// 会话条件
///
/// 定义格式：`{"key": "...", "match": "...", "value": "..."}`
pub struct SessionCriteria<P> {
    provider: P,
    evaluator: ConditionEvaluator,
}

impl<P: SessionProvider> SessionCriteria<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, &CriteriaConfig::default())
    }

    pub fn with_config(provider: P, config: &CriteriaConfig) -> Self {
        Self {
            provider,
            evaluator: ConditionEvaluator::new(config),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: SessionProvider> PersonalisationGroupCriteria for SessionCriteria<P> {
    fn name(&self) -> &'static str {
        "Session"
    }

    fn alias(&self) -> &'static str {
        "session"
    }

    fn description(&self) -> &'static str {
        "Matches visitor session with a defined key and value"
    }

    #[instrument(skip(self, definition), fields(criteria = self.alias()))]
    fn matches_visitor(&self, definition: Option<&str>) -> Result<bool> {
        let setting = DefinitionParser::parse(definition).inspect_err(|e| {
            metrics::counter!(
                CRITERIA_DEFINITION_ERRORS_TOTAL,
                "criteria" => self.alias(),
                "kind" => e.kind()
            )
            .increment(1);
        })?;

        let matched = self.evaluator.evaluate(&setting, &self.provider)?;

        metrics::counter!(
            CRITERIA_EVALUATIONS_TOTAL,
            "criteria" => self.alias(),
            "operator" => setting.session_match.as_str(),
            "matched" => if matched { "true" } else { "false" }
        )
        .increment(1);

        debug!(condition = %setting, matched, "访客条件评估完成");
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CriteriaError;
    use crate::provider::MockSessionProvider;
    use mockall::predicate::eq;

    const KEYS: [(&str, &str); 5] = [
        ("key", "aaa,bbb,ccc"),
        ("dateCompareTest", "1-MAY-2015 10:30:00"),
        ("numericCompareTest", "5"),
        ("stringCompareTest", "bbb"),
        ("regexTest", "b"),
    ];

    fn mock_session_provider() -> MockSessionProvider {
        let mut mock = MockSessionProvider::new();
        for (key, value) in KEYS {
            mock.expect_key_exists().with(eq(key)).returning(|_| Ok(true));
            mock.expect_get_value()
                .with(eq(key))
                .returning(move |_| Ok(Some(value.to_string())));
        }
        mock.expect_key_exists()
            .with(eq("missing-key"))
            .returning(|_| Ok(false));
        mock.expect_get_value()
            .with(eq("missing-key"))
            .returning(|_| Ok(None));
        mock
    }

    fn definition(key: &str, session_match: &str, value: &str) -> String {
        format!(
            r#"{{ "key": "{}", "match": "{}", "value": "{}" }}"#,
            key, session_match, value
        )
    }

    fn matches(key: &str, session_match: &str, value: &str) -> bool {
        let criteria = SessionCriteria::new(mock_session_provider());
        criteria
            .matches_visitor(Some(&definition(key, session_match, value)))
            .unwrap()
    }

    #[test]
    fn test_metadata() {
        let criteria = SessionCriteria::new(mock_session_provider());
        assert_eq!(criteria.name(), "Session");
        assert_eq!(criteria.alias(), "session");
        assert!(!criteria.description().is_empty());
    }

    #[test]
    fn test_empty_definition_fails() {
        let criteria = SessionCriteria::new(mock_session_provider());
        assert!(matches!(
            criteria.matches_visitor(None),
            Err(CriteriaError::MissingDefinition)
        ));
    }

    #[test]
    fn test_invalid_definition_fails() {
        let criteria = SessionCriteria::new(mock_session_provider());
        assert!(matches!(
            criteria.matches_visitor(Some("invalid")),
            Err(CriteriaError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn test_session_exists() {
        assert!(matches("key", "Exists", ""));
        assert!(!matches("missing-key", "Exists", ""));
    }

    #[test]
    fn test_session_absent() {
        assert!(matches("missing-key", "DoesNotExist", ""));
        assert!(!matches("key", "DoesNotExist", ""));
    }

    #[test]
    fn test_session_matching_value() {
        assert!(matches("key", "MatchesValue", "aaa,bbb,ccc"));
        assert!(!matches("key", "MatchesValue", "aaa,bbb,xxx"));
    }

    #[test]
    fn test_session_containing_value() {
        assert!(matches("key", "ContainsValue", "bbb"));
        assert!(!matches("key", "ContainsValue", "xxx"));
    }

    #[test]
    fn test_greater_than_value() {
        assert!(matches("dateCompareTest", "GreaterThanValue", "1-APR-2015"));
        assert!(!matches("dateCompareTest", "GreaterThanValue", "1-JUN-2015"));
        assert!(matches("numericCompareTest", "GreaterThanValue", "3"));
        assert!(!matches("numericCompareTest", "GreaterThanValue", "7"));
        assert!(matches("stringCompareTest", "GreaterThanValue", "aaa"));
        assert!(!matches("stringCompareTest", "GreaterThanValue", "ccc"));
    }

    #[test]
    fn test_less_than_value() {
        assert!(matches("dateCompareTest", "LessThanValue", "1-JUN-2015"));
        assert!(!matches("dateCompareTest", "LessThanValue", "1-APR-2015"));
        assert!(matches("numericCompareTest", "LessThanValue", "7"));
        assert!(!matches("numericCompareTest", "LessThanValue", "3"));
        assert!(matches("stringCompareTest", "LessThanValue", "ccc"));
        assert!(!matches("stringCompareTest", "LessThanValue", "aaa"));
    }

    #[test]
    fn test_regex() {
        assert!(matches("regexTest", "MatchesRegex", "[a-z]"));
        assert!(!matches("regexTest", "MatchesRegex", "[A-Z]"));
        assert!(!matches("regexTest", "DoesNotMatchRegex", "[a-z]"));
        assert!(matches("regexTest", "DoesNotMatchRegex", "[A-Z]"));
    }

    #[test]
    fn test_definition_error_skips_provider() {
        let mut mock = MockSessionProvider::new();
        mock.expect_key_exists().never();
        mock.expect_get_value().never();

        let criteria = SessionCriteria::new(mock);
        assert!(criteria.matches_visitor(Some("")).is_err());
        assert!(criteria
            .matches_visitor(Some(&definition("key", "Unknown", "")))
            .is_err());
    }
}
