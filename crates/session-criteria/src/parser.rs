//! 条件定义解析器
//!
//! 将 JSON 定义文本解析并校验为 [`SessionSetting`]。

use crate::error::{CriteriaError, Result};
use crate::models::{null_as_empty, SessionSetting};
use crate::operators::SessionMatch;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

/// 线上格式的原始记录
///
/// `match` 先按字符串读取，以便未知操作符给出明确的错误信息。
/// 额外字段一律忽略。
#[derive(Debug, Deserialize)]
struct RawSetting {
    key: String,
    #[serde(rename = "match")]
    session_match: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    value: String,
}

/// 条件定义解析器
pub struct DefinitionParser;

impl DefinitionParser {
    /// 解析条件定义
    ///
    /// `None` 与空字符串视为未提供定义；其余无法解码的输入均为无效定义。
    pub fn parse(definition: Option<&str>) -> Result<SessionSetting> {
        let definition = match definition {
            Some(text) if !text.is_empty() => text,
            _ => return Err(CriteriaError::MissingDefinition),
        };

        let raw: RawSetting = serde_json::from_str(definition)
            .map_err(|e| CriteriaError::malformed(definition, e.to_string()))?;

        let setting = Self::validate(definition, raw)?;
        debug!(key = %setting.key, operator = %setting.session_match, "条件定义已解析");
        Ok(setting)
    }

    fn validate(definition: &str, raw: RawSetting) -> Result<SessionSetting> {
        if raw.key.is_empty() {
            return Err(CriteriaError::malformed(definition, "key 不能为空"));
        }

        let session_match: SessionMatch = raw.session_match.parse().map_err(|_| {
            CriteriaError::malformed(
                definition,
                format!("未知的匹配操作符 '{}'", raw.session_match),
            )
        })?;

        // 预验证正则表达式，保证评估阶段不会失败
        if session_match.is_regex() {
            Regex::new(&raw.value).map_err(|e| {
                CriteriaError::malformed(definition, format!("正则表达式无效: {}", e))
            })?;
        }

        Ok(SessionSetting {
            key: raw.key,
            session_match,
            value: raw.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(key: &str, session_match: &str, value: &str) -> String {
        format!(
            r#"{{ "key": "{}", "match": "{}", "value": "{}" }}"#,
            key, session_match, value
        )
    }

    #[test]
    fn test_missing_definition() {
        assert!(matches!(
            DefinitionParser::parse(None),
            Err(CriteriaError::MissingDefinition)
        ));
        assert!(matches!(
            DefinitionParser::parse(Some("")),
            Err(CriteriaError::MissingDefinition)
        ));
    }

    #[test]
    fn test_invalid_definition() {
        for text in ["invalid", " ", "[]", "{}", r#"{"key": "k"}"#, r#"{"match": "Exists"}"#] {
            assert!(
                matches!(
                    DefinitionParser::parse(Some(text)),
                    Err(CriteriaError::MalformedDefinition { .. })
                ),
                "'{}' should be malformed",
                text
            );
        }
    }

    #[test]
    fn test_unknown_operator() {
        let err = DefinitionParser::parse(Some(&definition("key", "Equals", "x"))).unwrap_err();
        match err {
            CriteriaError::MalformedDefinition { reason, .. } => assert!(reason.contains("Equals")),
            other => panic!("unexpected error: {:?}", other),
        }

        // 操作符名称大小写敏感
        assert!(DefinitionParser::parse(Some(&definition("key", "exists", ""))).is_err());
    }

    #[test]
    fn test_empty_key() {
        assert!(matches!(
            DefinitionParser::parse(Some(&definition("", "Exists", ""))),
            Err(CriteriaError::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        assert!(matches!(
            DefinitionParser::parse(Some(&definition("key", "MatchesRegex", "[a-z"))),
            Err(CriteriaError::MalformedDefinition { .. })
        ));
        // 非正则操作符不校验 value
        assert!(DefinitionParser::parse(Some(&definition("key", "MatchesValue", "[a-z"))).is_ok());
    }

    #[test]
    fn test_fields_extracted_verbatim() {
        let setting =
            DefinitionParser::parse(Some(&definition(" key ", "ContainsValue", " bbb "))).unwrap();
        assert_eq!(setting.key, " key ");
        assert_eq!(setting.session_match, SessionMatch::ContainsValue);
        assert_eq!(setting.value, " bbb ");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let setting = DefinitionParser::parse(Some(
            r#"{ "key": "key", "match": "Exists", "value": "", "note": "legacy" }"#,
        ))
        .unwrap();
        assert_eq!(setting, SessionSetting::exists("key"));
    }

    #[test]
    fn test_round_trip() {
        for op in SessionMatch::ALL {
            let text = definition("basket", op.as_str(), "aaa,b.b");
            let setting = DefinitionParser::parse(Some(&text)).unwrap();
            let reparsed = DefinitionParser::parse(Some(&setting.to_definition().unwrap())).unwrap();
            assert_eq!(reparsed, setting);
            assert_eq!(reparsed.key, "basket");
            assert_eq!(reparsed.session_match, op);
            assert_eq!(reparsed.value, "aaa,b.b");
        }
    }
}
