//! 会话提供者
//!
//! 引擎只通过两个只读操作访问会话：键是否存在、读取键值。
//! 任何后端（内存、分布式会话、Cookie）实现 [`SessionProvider`] 即可接入。

use crate::error::{CriteriaError, Result};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// 会话提供者接口
///
/// 实现方需保证并发读取安全；返回的错误会原样传播给调用方。
#[cfg_attr(test, mockall::automock)]
pub trait SessionProvider: Send + Sync {
    /// 键是否存在于当前会话
    fn key_exists(&self, key: &str) -> Result<bool>;

    /// 读取键值，键不存在时返回 `None`
    fn get_value(&self, key: &str) -> Result<Option<String>>;
}

impl<P: SessionProvider + ?Sized> SessionProvider for Arc<P> {
    fn key_exists(&self, key: &str) -> Result<bool> {
        (**self).key_exists(key)
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        (**self).get_value(key)
    }
}

impl<P: SessionProvider + ?Sized> SessionProvider for &P {
    fn key_exists(&self, key: &str) -> Result<bool> {
        (**self).key_exists(key)
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        (**self).get_value(key)
    }
}

/// 内存会话
///
/// 基于 DashMap，可克隆共享，克隆体指向同一份数据。
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionProvider {
    values: Arc<DashMap<String, String>>,
}

impl InMemorySessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let provider = Self::new();
        for (key, value) in pairs {
            provider.insert(key, value);
        }
        provider
    }

    /// 从扁平 JSON 对象创建
    ///
    /// 字符串、数值、布尔值按文本存储；null 视为不存在；嵌套结构不支持。
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Value = serde_json::from_str(json)?;
        let Value::Object(map) = data else {
            return Err(CriteriaError::Provider(
                "会话数据必须是 JSON 对象".to_string(),
            ));
        };

        let provider = Self::new();
        for (key, value) in map {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(CriteriaError::Provider(format!(
                        "会话键 '{}' 的值必须是标量",
                        key
                    )));
                }
            };
            provider.insert(key, text);
        }
        Ok(provider)
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.remove(key).map(|(_, v)| v)
    }

    pub fn clear(&self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionProvider for InMemorySessionProvider {
    fn key_exists(&self, key: &str) -> Result<bool> {
        Ok(self.values.contains_key(key))
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }
}
