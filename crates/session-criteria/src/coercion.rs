//! 比较值类型推断
//!
//! 大小比较时依次尝试：日期时间 -> 数值 -> 字符串序。
//! 只有两侧都能按同一类型解析时才采用该类型，否则降级到下一层。

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

/// 比较时采用的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    DateTime,
    Numeric,
    Lexical,
}

/// 比较结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub coercion: Coercion,
    pub ordering: Ordering,
}

/// 值比较器
#[derive(Debug, Clone)]
pub struct ValueComparer {
    date_formats: Vec<String>,
}

impl ValueComparer {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self { date_formats }
    }

    /// 比较会话值与定义值
    pub fn compare(&self, left: &str, right: &str) -> Comparison {
        if let (Some(l), Some(r)) = (self.parse_datetime(left), self.parse_datetime(right)) {
            return Comparison {
                coercion: Coercion::DateTime,
                ordering: l.cmp(&r),
            };
        }

        if let (Some(l), Some(r)) = (parse_number(left), parse_number(right)) {
            // 两侧均为有限值，partial_cmp 必然有结果
            return Comparison {
                coercion: Coercion::Numeric,
                ordering: l.partial_cmp(&r).unwrap_or(Ordering::Equal),
            };
        }

        Comparison {
            coercion: Coercion::Lexical,
            ordering: left.cmp(right),
        }
    }

    /// 解析日期时间
    ///
    /// 先尝试 RFC 3339（统一换算为 UTC），再按配置的格式顺序尝试；
    /// 只有日期的格式取当天零点。
    pub fn parse_datetime(&self, value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.naive_utc());
        }

        self.date_formats.iter().find_map(|format| {
            NaiveDateTime::parse_from_str(value, format)
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(value, format)
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
        })
    }
}

/// 解析十进制数值
///
/// 允许符号、小数点和三位一组的千分位逗号（`1,000.5`）；
/// 指数写法、`NaN`/`inf` 不算数值。
fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | ','))
    {
        return None;
    }

    let (integer, fraction) = match value.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (value, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let digits = integer.trim_start_matches(['+', '-']);
    if digits.contains(',') {
        let mut groups = digits.split(',');
        let head = groups.next().unwrap_or_default();
        if head.is_empty() || head.len() > 3 || groups.any(|g| g.len() != 3) {
            return None;
        }
    }

    value
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
