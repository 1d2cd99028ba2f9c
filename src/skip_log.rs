//! 건너뛴 행 로그 모듈
//!
//! 필드 수가 맞지 않아 건너뛴 행을 읽는 즉시 로그 파일에 기록합니다.
//! 행을 메모리에 모아두지 않습니다.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::record::SkippedRow;

/// 건너뛴 행 로그 파일 writer
pub struct SkipLog<W: Write> {
    out: W,
    path: PathBuf,
    count: u64,
}

impl SkipLog<BufWriter<File>> {
    /// 로그 파일 생성 후 머리말 기록
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| ConvertError::FileCreateError {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::new(BufWriter::new(file), path)
    }
}

impl<W: Write> SkipLog<W> {
    pub fn new(out: W, path: impl Into<PathBuf>) -> Result<Self> {
        let mut log = Self {
            out,
            path: path.into(),
            count: 0,
        };

        let banner = format!(
            "csv2json 건너뛴 행 로그\n생성 시간: {}\n{}\n",
            chrono_now(),
            "=".repeat(50)
        );
        log.write_str(&banner)?;
        Ok(log)
    }

    /// 건너뛴 행 하나 기록
    pub fn record(&mut self, row: &SkippedRow) -> Result<()> {
        let entry = format!(
            "\n줄: {}\n내용: {}\n사유: {}\n",
            row.line, row.raw, row.reason
        );
        self.write_str(&entry)?;
        self.count += 1;
        Ok(())
    }

    /// 총계를 쓰고 플러시
    pub fn finish(mut self) -> Result<W> {
        let footer = format!("\n{}\n건너뛴 행 수: {}\n", "=".repeat(50), self.count);
        self.write_str(&footer)?;
        self.out.flush().map_err(|e| self.write_error(e))?;
        Ok(self.out)
    }

    fn write_str(&mut self, data: &str) -> Result<()> {
        self.out
            .write_all(data.as_bytes())
            .map_err(|e| self.write_error(e))
    }

    fn write_error(&self, e: std::io::Error) -> ConvertError {
        ConvertError::WriteError {
            file: self.path.clone(),
            reason: e.to_string(),
        }
    }
}

/// 현재 시간 문자열 반환
fn chrono_now() -> String {
    use std::time::SystemTime;
    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", duration.as_secs())
}
