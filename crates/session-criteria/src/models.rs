//! 会话条件领域模型

use crate::error::Result;
use crate::operators::SessionMatch;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 会话条件定义
///
/// 对应线上格式 `{"key": "...", "match": "...", "value": "..."}`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSetting {
    pub key: String,
    #[serde(rename = "match")]
    pub session_match: SessionMatch,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
}

impl SessionSetting {
    pub fn new(key: impl Into<String>, session_match: SessionMatch, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            session_match,
            value: value.into(),
        }
    }

    /// 仅检查存在性的条件，value 为空
    pub fn exists(key: impl Into<String>) -> Self {
        Self::new(key, SessionMatch::Exists, String::new())
    }

    pub fn does_not_exist(key: impl Into<String>) -> Self {
        Self::new(key, SessionMatch::DoesNotExist, String::new())
    }

    /// 重新序列化为定义文本
    pub fn to_definition(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for SessionSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.session_match.requires_value() {
            write!(f, "{} {} '{}'", self.key, self.session_match, self.value)
        } else {
            write!(f, "{} {}", self.key, self.session_match)
        }
    }
}

/// `"value": null` 与缺省等价
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
