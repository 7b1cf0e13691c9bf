//! 会话条件错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CriteriaError {
    /// 调用方没有提供任何定义
    #[error("条件定义为空")]
    MissingDefinition,

    /// 定义存在但无法解码为 key / match / value
    #[error("条件定义无效: {reason} (definition: {definition})")]
    MalformedDefinition { definition: String, reason: String },

    /// 会话提供者故障，原样向调用方传播
    #[error("会话提供者错误: {0}")]
    Provider(String),

    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

impl CriteriaError {
    pub fn malformed(definition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            definition: definition.into(),
            reason: reason.into(),
        }
    }

    /// 指标标签使用的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingDefinition => "missing_definition",
            Self::MalformedDefinition { .. } => "malformed_definition",
            Self::Provider(_) => "provider",
            Self::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, CriteriaError>;
