//! 会话个性化条件引擎
//!
//! 判断访客会话是否满足单个匹配条件，支持：
//! - JSON 条件定义解析与校验
//! - 存在性、值匹配、列表包含检查
//! - 日期 / 数值 / 字符串三级类型推断的大小比较
//! - 正则匹配

pub mod coercion;
pub mod config;
pub mod criteria;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod operators;
pub mod parser;
pub mod provider;

pub use coercion::{Coercion, Comparison, ValueComparer};
pub use crate::config::{CriteriaConfig, ServiceConfig};
pub use criteria::{PersonalisationGroupCriteria, SessionCriteria};
pub use error::{CriteriaError, Result};
pub use evaluator::ConditionEvaluator;
pub use models::SessionSetting;
pub use operators::SessionMatch;
pub use parser::DefinitionParser;
pub use provider::{InMemorySessionProvider, SessionProvider};
