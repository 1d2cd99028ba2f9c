//! JSON 직렬화 정책 모듈
//!
//! 압축/Pretty 출력 모드에 따라 레코드 직렬화 방식과 줄바꿈 토큰을 정합니다.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{ConvertError, Result};
use crate::record::Record;

/// Pretty 모드 들여쓰기 단위
pub const INDENT: &str = "   ";

/// 레코드 직렬화 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// 한 줄, 공백 없음
    #[default]
    Compact,
    /// 여러 줄, 배열 안에 맞춰 한 단계 더 들여쓰기
    Pretty,
}

impl JsonStyle {
    pub fn from_pretty(pretty: bool) -> Self {
        if pretty {
            JsonStyle::Pretty
        } else {
            JsonStyle::Compact
        }
    }

    /// 배열 괄호와 구분자 뒤에 붙는 줄바꿈 토큰
    pub fn line_break(self) -> &'static str {
        match self {
            JsonStyle::Compact => "",
            JsonStyle::Pretty => "\n",
        }
    }

    /// 레코드 하나를 JSON 텍스트로 변환 (끝 구분자 없음)
    pub fn serialize(self, record: &Record) -> Result<String> {
        match self {
            JsonStyle::Compact => serde_json::to_string(record).map_err(|e| {
                ConvertError::SerializeError {
                    reason: e.to_string(),
                }
            }),
            JsonStyle::Pretty => {
                let mut buf = Vec::new();
                let formatter = PrettyFormatter::with_indent(INDENT.as_bytes());
                let mut ser = Serializer::with_formatter(&mut buf, formatter);
                record
                    .serialize(&mut ser)
                    .map_err(|e| ConvertError::SerializeError {
                        reason: e.to_string(),
                    })?;

                let body = String::from_utf8(buf).map_err(|e| ConvertError::SerializeError {
                    reason: e.to_string(),
                })?;

                // 모든 줄 앞에 들여쓰기 한 단계 추가
                let nested = body.replace('\n', &format!("\n{INDENT}"));
                Ok(format!("{INDENT}{nested}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        [("b", "2"), ("a", "1")].into_iter().collect()
    }

    #[test]
    fn test_compact() {
        let style = JsonStyle::from_pretty(false);
        assert_eq!(style.line_break(), "");
        assert_eq!(style.serialize(&sample()).unwrap(), r#"{"a":"1","b":"2"}"#);
    }

    #[test]
    fn test_pretty() {
        let style = JsonStyle::from_pretty(true);
        assert_eq!(style.line_break(), "\n");
        assert_eq!(
            style.serialize(&sample()).unwrap(),
            "   {\n      \"a\": \"1\",\n      \"b\": \"2\"\n   }"
        );
    }

    #[test]
    fn test_values_stay_strings() {
        let record: Record = [("n", "42"), ("flag", "true")].into_iter().collect();
        let json = JsonStyle::Compact.serialize(&record).unwrap();
        assert_eq!(json, r#"{"flag":"true","n":"42"}"#);
    }

    #[test]
    fn test_escapes_control_characters() {
        let record: Record = [("text", "line1\nline2 \"quoted\"")].into_iter().collect();
        let json = JsonStyle::Pretty.serialize(&record).unwrap();
        assert_eq!(json.lines().count(), 3);
        assert!(json.contains(r#"line1\nline2 \"quoted\""#));
    }

    #[test]
    fn test_serialization_is_idempotent() {
        for style in [JsonStyle::Compact, JsonStyle::Pretty] {
            let first = style.serialize(&sample()).unwrap();
            let second = style.serialize(&sample()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_compact_and_pretty_parse_equal() {
        let compact: serde_json::Value =
            serde_json::from_str(&JsonStyle::Compact.serialize(&sample()).unwrap()).unwrap();
        let pretty: serde_json::Value =
            serde_json::from_str(&JsonStyle::Pretty.serialize(&sample()).unwrap()).unwrap();
        assert_eq!(compact, pretty);
    }
}
