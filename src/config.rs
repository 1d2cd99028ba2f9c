//! 설정 검증 모듈
//!
//! CLI 인자를 검증하여 변환 파이프라인이 사용할 불변 설정을 만듭니다.

use std::path::{Path, PathBuf};

use crate::cli::{Args, Separator};
use crate::error::{ConvertError, Result};

/// 검증이 끝난 변환 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 입력 CSV 파일 경로
    pub input: PathBuf,
    /// 컬럼 구분자
    pub separator: Separator,
    /// Pretty 출력 여부
    pub pretty: bool,
    /// 상세 출력 여부
    pub verbose: bool,
    /// 진행률 스피너 표시 여부
    pub progress: bool,
    /// 건너뛴 행 로그 파일 경로
    pub log: Option<PathBuf>,
}

impl Config {
    /// CLI 인자에서 설정 생성
    ///
    /// 경로 누락, csv가 아닌 확장자, 존재하지 않는 파일이면 에러를 반환합니다.
    /// 구분자는 clap의 `ValueEnum`이 이미 검증합니다.
    pub fn from_args(args: &Args) -> Result<Self> {
        let input = args.input.clone().ok_or(ConvertError::MissingPath)?;
        check_file_validity(&input)?;

        Ok(Self {
            input,
            separator: args.separator,
            pretty: args.pretty,
            verbose: args.verbose,
            progress: args.progress,
            log: args.log.clone(),
        })
    }

    /// 최소 설정 생성 (라이브러리 사용 및 테스트용)
    pub fn new(input: impl Into<PathBuf>, separator: Separator, pretty: bool) -> Self {
        Self {
            input: input.into(),
            separator,
            pretty,
            verbose: false,
            progress: false,
            log: None,
        }
    }
}

/// csv 확장자 및 파일 존재 여부 확인
pub fn check_file_validity(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if !is_csv {
        return Err(ConvertError::NotCsv {
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(ConvertError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}
