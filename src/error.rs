//! 에러 타입 정의 모듈
//!
//! csv2json에서 발생할 수 있는 모든 에러 타입을 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// csv2json에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 입력 파일 경로 인자 없음
    #[error("a filepath argument is required")]
    MissingPath,

    /// 확장자가 csv가 아님
    #[error("file {path} is not CSV")]
    NotCsv { path: PathBuf },

    /// 입력 파일이 존재하지 않음
    #[error("file {path} does not exist")]
    InputNotFound { path: PathBuf },

    /// CSV 파일 열기 실패
    #[error("cannot open {file}: {reason}")]
    FileOpenError { file: PathBuf, reason: String },

    /// 헤더 행이 없음 (빈 파일)
    #[error("{file} is empty, a header row is required")]
    EmptyInput { file: PathBuf },

    /// CSV 읽기 실패
    #[error("failed to read {file} (line {line}): {reason}")]
    ReadError {
        file: PathBuf,
        line: u64,
        reason: String,
    },

    /// 헤더와 필드 개수 불일치 (복구 가능, 해당 행만 건너뜀)
    #[error("line doesn't match headers format (expected {expected} fields, found {found}). Skipping")]
    FieldCountMismatch { expected: usize, found: usize },

    /// JSON 파일 생성 실패
    #[error("cannot create {file}: {reason}")]
    FileCreateError { file: PathBuf, reason: String },

    /// 파일 쓰기 실패
    #[error("failed to write {file}: {reason}")]
    WriteError { file: PathBuf, reason: String },

    /// JSON 직렬화 실패
    #[error("JSON serialization failed: {reason}")]
    SerializeError { reason: String },

    /// 잘못된 순서로 writer 호출
    #[error("JSON writer is {state}, cannot {action}")]
    WriterState {
        state: &'static str,
        action: &'static str,
    },

    /// writer 단계가 먼저 종료되어 레코드를 넘길 수 없음
    #[error("writer stage stopped before all records were handed off")]
    HandoffClosed,

    /// reader 단계가 스트림 종료 신호 없이 끊김
    #[error("reader stage stopped before the end of input")]
    StreamAborted,

    /// 스레드 패닉
    #[error("{stage} stage panicked")]
    StagePanicked { stage: &'static str },
}

impl ConvertError {
    /// 다른 단계의 실패로 인해 파생된 에러인지 여부
    pub fn is_derivative(&self) -> bool {
        matches!(self, ConvertError::HandoffClosed | ConvertError::StreamAborted)
    }
}

/// csv2json 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ConvertError>;
