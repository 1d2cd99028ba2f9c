//! csv2json - CSV TO JSON CONVERTER
//!
//! CSV 파일을 헤더 기준 JSON 객체 배열로 변환하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🔀 **스트리밍 변환**: reader/writer 두 스레드를 용량 0 채널로 연결하여
//!   한 번에 레코드 하나만 메모리에 유지
//! - ⚠️ **행 검증**: 헤더와 필드 수가 다른 행은 건너뛰고 보고
//! - ✨ **Pretty 출력**: 들여쓰기된 여러 줄 JSON 지원
//! - 📈 **상세 통계**: 읽은 행, 변환 레코드, 건너뛴 행, 출력 용량 표시
//! - 📝 **로그 파일**: 건너뛴 행 목록 저장
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법 (data.csv -> data.json)
//! csv2json data.csv
//!
//! # 세미콜론 구분자, Pretty 출력
//! csv2json --separator=semicolon --pretty data.csv
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod json_style;
pub mod pipeline;
pub mod reader;
pub mod record;
pub mod skip_log;
pub mod stats;
pub mod writer;

// Re-exports for convenient access
pub use cli::{Args, Separator};
pub use config::Config;
pub use error::{ConvertError, Result};
pub use json_style::JsonStyle;
pub use pipeline::{convert_file, run, Handoff, PipelineReport};
pub use reader::{RowReader, Row};
pub use record::{Header, Record, SkippedRow};
pub use skip_log::SkipLog;
pub use stats::{format_bytes, format_duration, Statistics};
pub use writer::{output_path, JsonArrayWriter};
