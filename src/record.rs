//! 헤더/레코드 모델 모듈
//!
//! CSV 행을 헤더 이름을 키로 하는 레코드로 변환합니다.

use csv::ByteRecord;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{ConvertError, Result};

/// CSV 첫 행에서 읽은 컬럼 이름 목록
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// 컬럼 수 (모든 데이터 행이 맞춰야 하는 필드 수)
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 헤더와 행의 필드를 위치 순서대로 묶어 레코드 생성
    ///
    /// UTF-8이 아닌 바이트는 U+FFFD로 바뀝니다.
    ///
    /// # Arguments
    /// * `row` - 파싱된 CSV 행
    ///
    /// # Returns
    /// 필드 수가 헤더와 다르면 `FieldCountMismatch`
    pub fn build_record(&self, row: &ByteRecord) -> Result<Record> {
        if row.len() != self.len() {
            return Err(ConvertError::FieldCountMismatch {
                expected: self.len(),
                found: row.len(),
            });
        }

        let fields = self
            .columns
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.clone(), lossy(value)))
            .collect();

        Ok(Record { fields })
    }
}

impl From<&ByteRecord> for Header {
    fn from(row: &ByteRecord) -> Self {
        Self::new(row.iter().map(lossy).collect())
    }
}

fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// 한 데이터 행 (컬럼 이름 -> 셀 값)
///
/// 키는 정렬된 순서로 직렬화됩니다. 헤더에 같은 이름이 여러 번 나오면
/// 가장 오른쪽 컬럼의 값이 남습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 필드 수 불일치로 건너뛴 행
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 원본 파일의 줄 번호 (1부터 시작)
    pub line: u64,
    /// CSV 한 줄로 다시 인코딩한 행 (필요한 곳은 따옴표 복원)
    pub raw: String,
    /// 건너뛴 이유
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Header {
        Header::from(&ByteRecord::from(names.to_vec()))
    }

    #[test]
    fn test_build_record() {
        let header = header(&["a", "b"]);
        let record = header
            .build_record(&ByteRecord::from(vec!["1", "2"]))
            .unwrap();

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some("1"));
        assert_eq!(record.get("b"), Some("2"));
    }

    #[test]
    fn test_build_record_mismatch() {
        let header = header(&["a", "b"]);
        let err = header
            .build_record(&ByteRecord::from(vec!["3"]))
            .unwrap_err();

        match err {
            ConvertError::FieldCountMismatch { expected, found } => {
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_record_too_many_fields() {
        let header = header(&["a"]);
        let result = header.build_record(&ByteRecord::from(vec!["1", "2"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let header = header(&["id", "id"]);
        let record = header
            .build_record(&ByteRecord::from(vec!["first", "second"]))
            .unwrap();

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("id"), Some("second"));
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let header = header(&["name", "city"]);
        let row = ByteRecord::from(vec![&b"Ren\xe9"[..], &b"Paris"[..]]);
        let record = header.build_record(&row).unwrap();

        assert_eq!(record.get("name"), Some("Ren\u{fffd}"));
        assert_eq!(record.get("city"), Some("Paris"));
    }

    #[test]
    fn test_record_serializes_as_object() {
        let record: Record = [("b", "2"), ("a", "1")].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"a":"1","b":"2"}"#);
    }
}
