//! 会话匹配操作符定义

use crate::error::{CriteriaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 会话匹配操作符
///
/// 序列化名称与定义中的 `match` 字段一一对应，大小写敏感。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionMatch {
    // 存在性检查
    Exists,
    DoesNotExist,

    // 值匹配
    MatchesValue,
    ContainsValue,

    // 比较（日期 -> 数值 -> 字符串）
    GreaterThanValue,
    LessThanValue,

    // 正则
    MatchesRegex,
    DoesNotMatchRegex,
}

impl SessionMatch {
    /// 按声明顺序列出全部操作符
    pub const ALL: [SessionMatch; 8] = [
        Self::Exists,
        Self::DoesNotExist,
        Self::MatchesValue,
        Self::ContainsValue,
        Self::GreaterThanValue,
        Self::LessThanValue,
        Self::MatchesRegex,
        Self::DoesNotMatchRegex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exists => "Exists",
            Self::DoesNotExist => "DoesNotExist",
            Self::MatchesValue => "MatchesValue",
            Self::ContainsValue => "ContainsValue",
            Self::GreaterThanValue => "GreaterThanValue",
            Self::LessThanValue => "LessThanValue",
            Self::MatchesRegex => "MatchesRegex",
            Self::DoesNotMatchRegex => "DoesNotMatchRegex",
        }
    }

    /// 操作符是否读取定义中的 value
    pub fn requires_value(&self) -> bool {
        !matches!(self, Self::Exists | Self::DoesNotExist)
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Self::MatchesRegex | Self::DoesNotMatchRegex)
    }
}

impl fmt::Display for SessionMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionMatch {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| CriteriaError::malformed(s, format!("未知的匹配操作符 '{}'", s)))
    }
}
