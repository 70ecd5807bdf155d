//! src/error.rs
//!
//! 错误类型。
//! `DecodeError` 只影响单条记录（记录会被跳过），
//! `ConvertError` 则会让整个文件转换失败。

use std::path::PathBuf;

use itertools::Itertools;

/// 解析单条记录时可能出现的错误。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// 缺少必需字段，字段名可能是嵌套路径，例如 `Size.Min`。
    #[error("缺少字段 {0}")]
    MissingField(String),

    /// 字段的值无法转换为所需类型。
    #[error("字段 {field} 的值 {found} 无法转换为 {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// 枚举字段的值不在允许范围内。
    #[error("字段 {field} 的值 \"{value}\" 无效，可选值：{}", .allowed.iter().join(", "))]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
}

impl DecodeError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str, found: &serde_json::Value) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
            found: found.to_string(),
        }
    }
}

/// 转换整个输入文件时可能出现的错误。
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("读写 {path} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} 不是合法的 JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} 的顶层必须是 JSON 对象")]
    NotAnObject { path: PathBuf },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_enum_lists_allowed_values() {
        let err = DecodeError::InvalidEnum {
            field: "Weather",
            value: "foggy".to_string(),
            allowed: &["sunny", "rainy", "both"],
        };
        let msg = err.to_string();
        assert!(msg.contains("Weather"));
        assert!(msg.contains("foggy"));
        assert!(msg.contains("sunny, rainy, both"));
    }

    #[test]
    fn wrong_type_shows_received_value() {
        let err = DecodeError::wrong_type("MaxDepth", "integer", &serde_json::json!("deep"));
        assert_eq!(
            err,
            DecodeError::WrongType {
                field: "MaxDepth".to_string(),
                expected: "integer",
                found: "\"deep\"".to_string(),
            }
        );
    }
}
