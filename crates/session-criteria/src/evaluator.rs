//! 条件评估器
//!
//! 按操作符对会话值执行匹配。键不存在时值按空字符串处理，
//! 评估本身不会失败，错误只可能来自会话提供者。

use crate::coercion::{Comparison, ValueComparer};
use crate::config::CriteriaConfig;
use crate::error::Result;
use crate::models::SessionSetting;
use crate::operators::SessionMatch;
use crate::provider::SessionProvider;
use dashmap::DashMap;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{trace, warn};

/// 条件评估器
#[derive(Debug, Clone)]
pub struct ConditionEvaluator {
    comparer: ValueComparer,
    regex_cache: Arc<DashMap<String, Regex>>,
    regex_cache_capacity: usize,
}

impl Default for ConditionEvaluator {
    fn default() -> Self {
        Self::new(&CriteriaConfig::default())
    }
}

impl ConditionEvaluator {
    pub fn new(config: &CriteriaConfig) -> Self {
        Self {
            comparer: ValueComparer::new(config.date_formats.clone()),
            regex_cache: Arc::new(DashMap::new()),
            regex_cache_capacity: config.regex_cache_capacity,
        }
    }

    /// 评估条件
    ///
    /// # Arguments
    /// * `setting` - 已解析的条件
    /// * `provider` - 会话提供者，每次评估都会重新查询
    pub fn evaluate(&self, setting: &SessionSetting, provider: &dyn SessionProvider) -> Result<bool> {
        let matched = match setting.session_match {
            SessionMatch::Exists => provider.key_exists(&setting.key)?,
            SessionMatch::DoesNotExist => !provider.key_exists(&setting.key)?,
            SessionMatch::MatchesValue => {
                Self::matches_value(&Self::fetch(provider, &setting.key)?, &setting.value)
            }
            SessionMatch::ContainsValue => {
                Self::contains_value(&Self::fetch(provider, &setting.key)?, &setting.value)
            }
            SessionMatch::GreaterThanValue => {
                self.compare(&Self::fetch(provider, &setting.key)?, &setting.value)
                    .ordering
                    == Ordering::Greater
            }
            SessionMatch::LessThanValue => {
                self.compare(&Self::fetch(provider, &setting.key)?, &setting.value)
                    .ordering
                    == Ordering::Less
            }
            SessionMatch::MatchesRegex => {
                self.regex_match(&Self::fetch(provider, &setting.key)?, &setting.value)
            }
            SessionMatch::DoesNotMatchRegex => {
                !self.regex_match(&Self::fetch(provider, &setting.key)?, &setting.value)
            }
        };

        trace!(condition = %setting, matched, "条件评估完成");
        Ok(matched)
    }

    /// 读取会话值，不存在时为空字符串
    fn fetch(provider: &dyn SessionProvider, key: &str) -> Result<String> {
        Ok(provider.get_value(key)?.unwrap_or_default())
    }

    /// 整体字面量相等，大小写敏感
    fn matches_value(value: &str, expected: &str) -> bool {
        value == expected
    }

    /// 会话值视为逗号分隔列表，任一项与定义值完全相等即匹配
    fn contains_value(value: &str, expected: &str) -> bool {
        value.split(',').any(|token| token == expected)
    }

    fn compare(&self, value: &str, expected: &str) -> Comparison {
        let comparison = self.comparer.compare(value, expected);
        trace!(
            value,
            expected,
            coercion = ?comparison.coercion,
            ordering = ?comparison.ordering,
            "比较完成"
        );
        comparison
    }

    /// 正则搜索（不要求整串匹配）
    fn regex_match(&self, value: &str, pattern: &str) -> bool {
        if let Some(regex) = self.regex_cache.get(pattern) {
            return regex.is_match(value);
        }

        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(e) => {
                // 解析阶段已校验，只有手工构造的条件会走到这里
                warn!(pattern, error = %e, "正则表达式无效，按不匹配处理");
                return false;
            }
        };

        let matched = regex.is_match(value);
        if self.regex_cache_capacity > 0 {
            if self.regex_cache.len() >= self.regex_cache_capacity {
                self.regex_cache.clear();
            }
            self.regex_cache.insert(pattern.to_string(), regex);
        }
        matched
    }

    /// 当前缓存的正则数量
    pub fn cached_patterns(&self) -> usize {
        self.regex_cache.len()
    }
}
