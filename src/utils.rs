//! src/utils.rs
//!
//! 存放可复用的、无状态的工具函数。
//! 包括目标格式的数字渲染，以及从 JSON 字段到具体类型的宽松转换。

use crate::error::DecodeError;
use serde_json::{Map, Value};

/// 去掉以 "0." 开头的小数的前导 0，例如 "0.4" -> ".4"。
/// 其他字符串（包括 "10.5"、"-0.5"、"0"）原样返回。
pub fn strip_leading_zero(num: &str) -> &str {
    if num.starts_with("0.") { &num[1..] } else { num }
}

/// 按游戏数据文件的习惯渲染小数：
/// 整数值保留 ".0"，极小/极大值使用带符号的两位指数，例如 `1e-05`、`1e+16`。
pub fn format_decimal(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Debug 输出是最短的可往返表示，指数阈值也与目标格式一致
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// 小数渲染后再去掉前导 0，用于倍率和概率字段。
pub fn format_fraction(value: f64) -> String {
    strip_leading_zero(&format_decimal(value)).to_string()
}

/// 读取必需字段。缺失或为 null 都视为缺失。
pub fn require<'a>(value: Option<&'a Value>, path: &str) -> Result<&'a Value, DecodeError> {
    match value {
        Some(Value::Null) | None => Err(DecodeError::missing(path)),
        Some(value) => Ok(value),
    }
}

/// 整数转换：接受整数、小数（向零截断）、数字字符串和布尔值。
/// 超出 i64 范围的整数视为类型错误。
pub fn as_integer(value: &Value, path: &str) -> Result<i64, DecodeError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_to_i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };
    parsed.ok_or_else(|| DecodeError::wrong_type(path, "integer", value))
}

fn truncate_to_i64(f: f64) -> Option<i64> {
    let truncated = f.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

/// 小数转换：接受数字、数字字符串和布尔值。
pub fn as_decimal(value: &Value, path: &str) -> Result<f64, DecodeError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.ok_or_else(|| DecodeError::wrong_type(path, "decimal", value))
}

/// 布尔转换，不会失败：空值和 0 为假，其余为真。
/// 唯一的例外是字符串 "false"（忽略大小写），它被视为假。
pub fn as_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && !s.trim().eq_ignore_ascii_case("false"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

pub fn as_text<'a>(value: &'a Value, path: &str) -> Result<&'a str, DecodeError> {
    value
        .as_str()
        .ok_or_else(|| DecodeError::wrong_type(path, "string", value))
}

/// 任意值的文本形式：字符串原样返回，其他值使用 JSON 文本。
pub fn as_display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::wrong_type(path, "object", value))
}

pub fn as_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, DecodeError> {
    value
        .as_array()
        .ok_or_else(|| DecodeError::wrong_type(path, "array", value))
}

pub fn integer_field(value: Option<&Value>, path: &str) -> Result<i64, DecodeError> {
    as_integer(require(value, path)?, path)
}

pub fn decimal_field(value: Option<&Value>, path: &str) -> Result<f64, DecodeError> {
    as_decimal(require(value, path)?, path)
}

pub fn bool_field(value: Option<&Value>, path: &str) -> Result<bool, DecodeError> {
    Ok(as_bool(require(value, path)?))
}

pub fn text_field<'a>(value: Option<&'a Value>, path: &str) -> Result<&'a str, DecodeError> {
    as_text(require(value, path)?, path)
}

pub fn display_field(value: Option<&Value>, path: &str) -> Result<String, DecodeError> {
    Ok(as_display_text(require(value, path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_only_exact_zero_dot_prefix() {
        assert_eq!(strip_leading_zero("0.4"), ".4");
        assert_eq!(strip_leading_zero("0.45"), ".45");
        assert_eq!(strip_leading_zero("1.5"), "1.5");
        assert_eq!(strip_leading_zero("0"), "0");
        assert_eq!(strip_leading_zero("10.5"), "10.5");
        assert_eq!(strip_leading_zero("-0.5"), "-0.5");
    }

    #[test]
    fn decimals_render_like_game_data() {
        assert_eq!(format_decimal(0.4), "0.4");
        assert_eq!(format_decimal(1.0), "1.0");
        assert_eq!(format_decimal(100.0), "100.0");
        assert_eq!(format_decimal(-0.5), "-0.5");
        assert_eq!(format_decimal(0.00001), "1e-05");
        assert_eq!(format_decimal(1e16), "1e+16");
        assert_eq!(format_decimal(f64::NAN), "nan");
    }

    #[test]
    fn fractions_drop_leading_zero() {
        assert_eq!(format_fraction(0.4), ".4");
        assert_eq!(format_fraction(0.1), ".1");
        assert_eq!(format_fraction(2.0), "2.0");
    }

    #[test]
    fn integer_coercion() {
        assert_eq!(as_integer(&json!(5), "X"), Ok(5));
        assert_eq!(as_integer(&json!(3.9), "X"), Ok(3));
        assert_eq!(as_integer(&json!(-3.9), "X"), Ok(-3));
        assert_eq!(as_integer(&json!(" 42 "), "X"), Ok(42));
        assert_eq!(as_integer(&json!(true), "X"), Ok(1));
        assert!(matches!(
            as_integer(&json!("3.5"), "X"),
            Err(DecodeError::WrongType { expected: "integer", .. })
        ));
        assert!(as_integer(&json!([1]), "X").is_err());
    }

    #[test]
    fn decimal_coercion() {
        assert_eq!(as_decimal(&json!(0.25), "X"), Ok(0.25));
        assert_eq!(as_decimal(&json!(2), "X"), Ok(2.0));
        assert_eq!(as_decimal(&json!("0.3"), "X"), Ok(0.3));
        assert!(as_decimal(&json!("lots"), "X").is_err());
    }

    #[test]
    fn integers_beyond_i64_are_rejected() {
        let huge: Value = serde_json::from_str("100000000000000000000").unwrap();
        assert!(matches!(
            as_integer(&huge, "X"),
            Err(DecodeError::WrongType { expected: "integer", .. })
        ));
    }

    #[test]
    fn bool_coercion_never_fails() {
        assert!(as_bool(&json!(true)));
        assert!(!as_bool(&json!(0)));
        assert!(as_bool(&json!(2.5)));
        assert!(as_bool(&json!("yes")));
        assert!(!as_bool(&json!("")));
        assert!(!as_bool(&json!("FALSE")));
        assert!(!as_bool(&json!([])));
        assert!(as_bool(&json!([0])));
        assert!(!as_bool(&json!({})));
        assert!(as_bool(&json!({ "a": 1 })));
    }

    #[test]
    fn display_text_keeps_strings_and_renders_the_rest() {
        assert_eq!(as_display_text(&json!("Carp")), "Carp");
        assert_eq!(as_display_text(&json!(5)), "5");
        assert_eq!(as_display_text(&json!(true)), "true");
    }

    #[test]
    fn null_counts_as_missing() {
        let fields = json!({ "MaxDepth": null });
        assert_eq!(
            integer_field(fields.get("MaxDepth"), "MaxDepth"),
            Err(DecodeError::MissingField("MaxDepth".to_string()))
        );
        assert_eq!(
            bool_field(fields.get("TutorialCatch"), "TutorialCatch"),
            Err(DecodeError::MissingField("TutorialCatch".to_string()))
        );
    }
}
