//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CSV 컬럼 구분자
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Separator {
    /// 쉼표 (,)
    #[default]
    Comma,
    /// 세미콜론 (;)
    Semicolon,
}

impl Separator {
    /// csv 리더에 넘길 구분자 바이트
    pub fn as_byte(self) -> u8 {
        match self {
            Separator::Comma => b',',
            Separator::Semicolon => b';',
        }
    }

    pub fn as_char(self) -> char {
        self.as_byte() as char
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Separator::Comma => write!(f, "comma"),
            Separator::Semicolon => write!(f, "semicolon"),
        }
    }
}

/// csv2json CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "csv2json",
    author = "YourName <your@email.com>",
    version,
    about = "CSV TO JSON CONVERTER - CSV 파일을 JSON 배열로 스트리밍 변환하는 CLI 도구",
    long_about = r#"
CSV TO JSON CONVERTER
=====================

CSV 파일의 첫 행을 헤더로 사용하여 각 행을 JSON 객체로 변환하고,
입력 파일과 같은 폴더에 <이름>.json 배열 파일로 저장합니다.

특징:
  • 읽기/쓰기 단계 분리로 파일 전체를 메모리에 올리지 않음
  • 헤더와 컬럼 수가 맞지 않는 행은 건너뛰고 보고
  • 쉼표/세미콜론 구분자 지원
  • Pretty 출력 지원

예제:
  csv2json data.csv
  csv2json --separator=semicolon data.csv
  csv2json --pretty --verbose data.csv
  csv2json --log skipped.log data.csv
"#
)]
pub struct Args {
    /// 변환할 CSV 파일 경로
    #[arg(value_name = "CSV_FILE")]
    pub input: Option<PathBuf>,

    /// 컬럼 구분자
    #[arg(long, value_enum, default_value_t = Separator::Comma)]
    pub separator: Separator,

    /// 들여쓰기된 JSON 출력 (기본값: 압축)
    #[arg(long)]
    pub pretty: bool,

    /// 상세 출력 모드 (헤더 및 통계 출력)
    #[arg(short, long)]
    pub verbose: bool,

    /// 진행률 스피너 표시
    #[arg(long)]
    pub progress: bool,

    /// 건너뛴 행 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,
}
