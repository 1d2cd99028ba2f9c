//! CSV 읽기 단계 모듈
//!
//! 헤더를 읽은 뒤 각 행을 레코드로 변환하여 writer 단계로 넘깁니다.

use colored::Colorize;
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc::SyncSender;

use crate::cli::Separator;
use crate::error::{ConvertError, Result};
use crate::pipeline::Handoff;
use crate::record::{Header, Record, SkippedRow};
use crate::skip_log::SkipLog;
use crate::stats::Statistics;

/// 데이터 행 하나의 처리 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// 헤더와 필드 수가 일치하는 행
    Record(Record),
    /// 필드 수가 맞지 않아 건너뛴 행
    Skipped(SkippedRow),
}

/// 헤더를 기준으로 행을 레코드로 읽는 CSV 리더
///
/// 셀 값의 인코딩은 검사하지 않고 UTF-8이 아닌 바이트는 U+FFFD로 바꿉니다.
pub struct RowReader<R: Read> {
    inner: csv::Reader<R>,
    header: Header,
    separator: Separator,
    source: PathBuf,
    row: ByteRecord,
}

impl RowReader<File> {
    /// CSV 파일을 열고 헤더 행을 읽음
    pub fn open(path: &Path, separator: Separator) -> Result<Self> {
        let file = File::open(path).map_err(|e| ConvertError::FileOpenError {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_reader(file, separator, path)
    }
}

impl<R: Read> RowReader<R> {
    /// 임의의 `Read`에서 리더 생성
    ///
    /// # Arguments
    /// * `reader` - CSV 바이트 소스
    /// * `separator` - 컬럼 구분자
    /// * `source` - 에러 메시지에 쓸 원본 경로
    ///
    /// # Returns
    /// 헤더를 읽은 리더. 입력이 비어 있으면 `EmptyInput`
    pub fn from_reader(reader: R, separator: Separator, source: &Path) -> Result<Self> {
        // 필드 수 검사는 직접 하므로 flexible 모드 사용
        let mut inner = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(separator.as_byte())
            .flexible(true)
            .from_reader(reader);

        let mut row = ByteRecord::new();
        let has_header = inner
            .read_byte_record(&mut row)
            .map_err(|e| read_error(source, &inner, e))?;

        if !has_header {
            return Err(ConvertError::EmptyInput {
                file: source.to_path_buf(),
            });
        }

        Ok(Self {
            header: Header::from(&row),
            inner,
            separator,
            source: source.to_path_buf(),
            row,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// 다음 데이터 행 읽기
    ///
    /// 입력 끝이면 `None`, 필드 수 불일치는 `Row::Skipped`로 반환하고
    /// 파싱이나 I/O 자체가 실패하면 에러를 반환합니다.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        let more = self
            .inner
            .read_byte_record(&mut self.row)
            .map_err(|e| read_error(&self.source, &self.inner, e))?;

        if !more {
            return Ok(None);
        }

        match self.header.build_record(&self.row) {
            Ok(record) => Ok(Some(Row::Record(record))),
            Err(e @ ConvertError::FieldCountMismatch { .. }) => {
                Ok(Some(Row::Skipped(self.skipped_row(e.to_string())?)))
            }
            Err(e) => Err(e),
        }
    }

    fn skipped_row(&self, reason: String) -> Result<SkippedRow> {
        let line = self
            .row
            .position()
            .map(|p| p.line())
            .unwrap_or_else(|| self.inner.position().line());

        Ok(SkippedRow {
            line,
            raw: encode_row(&self.row, self.separator)?,
            reason,
        })
    }
}

/// 행을 같은 구분자의 CSV 한 줄로 다시 인코딩 (줄바꿈 제외)
fn encode_row(row: &ByteRecord, separator: Separator) -> Result<String> {
    let serialize_error = |reason: String| ConvertError::SerializeError { reason };

    let mut wtr = WriterBuilder::new()
        .delimiter(separator.as_byte())
        .from_writer(Vec::new());
    wtr.write_byte_record(row)
        .map_err(|e| serialize_error(e.to_string()))?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| serialize_error(e.to_string()))?;

    Ok(String::from_utf8_lossy(&bytes)
        .trim_end_matches(&['\r', '\n'][..])
        .to_string())
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

fn read_error<R: Read>(source: &Path, reader: &csv::Reader<R>, e: csv::Error) -> ConvertError {
    let line = e
        .position()
        .map(|p| p.line())
        .unwrap_or_else(|| reader.position().line());

    ConvertError::ReadError {
        file: source.to_path_buf(),
        line,
        reason: e.to_string(),
    }
}

/// 건너뛴 행 진단 메시지 출력 (stdout)
pub fn report_skipped(row: &SkippedRow, progress: &ProgressBar) {
    progress.suspend(|| {
        println!(
            "{}",
            format!("Line {}: [{}] Error: {}", row.line, row.raw, row.reason).yellow()
        );
    });
}

/// reader 단계 실행
///
/// 모든 레코드를 순서대로 `tx`로 넘기고 마지막에 `EndOfStream`을 보냅니다.
/// 전송은 writer가 받을 때까지 블록됩니다. 건너뛴 행은 출력 후
/// `log`가 있으면 바로 기록하고 버립니다.
///
/// # Returns
/// 건너뛴 행 수
pub fn produce<R: Read>(
    mut rows: RowReader<R>,
    log: Option<&Path>,
    tx: SyncSender<Handoff>,
    progress: &ProgressBar,
    stats: &Statistics,
) -> Result<u64> {
    let mut log = log.map(SkipLog::create).transpose()?;
    let mut skipped = 0;

    while let Some(row) = rows.next_row()? {
        stats.increment_read();

        match row {
            Row::Record(record) => tx
                .send(Handoff::Record(record))
                .map_err(|_| ConvertError::HandoffClosed)?,
            Row::Skipped(row) => {
                skipped += 1;
                stats.increment_skipped();
                report_skipped(&row, progress);
                if let Some(log) = log.as_mut() {
                    log.record(&row)?;
                }
            }
        }
    }

    if let Some(log) = log {
        log.finish()?;
    }

    tx.send(Handoff::EndOfStream)
        .map_err(|_| ConvertError::HandoffClosed)?;

    Ok(skipped)
}
