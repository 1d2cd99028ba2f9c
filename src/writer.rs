//! JSON 쓰기 단계 모듈
//!
//! reader 단계에서 넘어온 레코드를 순서대로 JSON 배열 파일에 씁니다.

use colored::Colorize;
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use crate::error::{ConvertError, Result};
use crate::json_style::JsonStyle;
use crate::pipeline::Handoff;
use crate::record::Record;
use crate::stats::Statistics;

/// 입력 CSV 경로에서 출력 JSON 경로 생성 (같은 폴더, 확장자만 교체)
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension("json")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Open { first: bool },
    Closed,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::Init => "not started",
            State::Open { .. } => "open",
            State::Closed => "closed",
        }
    }
}

/// JSON 배열 writer
///
/// `begin` → `write_record`* → `finish` 순서로만 호출할 수 있습니다.
/// 쓰기 에러는 모두 즉시 반환되며 부분 출력은 정리하지 않습니다.
pub struct JsonArrayWriter<W: Write> {
    out: W,
    style: JsonStyle,
    state: State,
    destination: PathBuf,
    bytes_written: u64,
}

impl<W: Write> JsonArrayWriter<W> {
    pub fn new(out: W, style: JsonStyle, destination: impl Into<PathBuf>) -> Self {
        Self {
            out,
            style,
            state: State::Init,
            destination: destination.into(),
            bytes_written: 0,
        }
    }

    /// 여는 괄호 쓰기
    pub fn begin(&mut self) -> Result<()> {
        self.expect_state(State::Init, "begin")?;
        let opening = format!("[{}", self.style.line_break());
        self.write_str(&opening)?;
        self.state = State::Open { first: true };
        Ok(())
    }

    /// 레코드 하나 쓰기 (첫 레코드가 아니면 앞에 구분자)
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let State::Open { first } = self.state else {
            return Err(self.state_error("write a record"));
        };

        if !first {
            let separator = format!(",{}", self.style.line_break());
            self.write_str(&separator)?;
        }

        let json = self.style.serialize(record)?;
        self.write_str(&json)?;
        self.state = State::Open { first: false };
        Ok(())
    }

    /// 닫는 괄호를 쓰고 버퍼 플러시
    pub fn finish(&mut self) -> Result<()> {
        if !matches!(self.state, State::Open { .. }) {
            return Err(self.state_error("finish"));
        }

        let closing = format!("{}]", self.style.line_break());
        self.write_str(&closing)?;
        self.out.flush().map_err(|e| self.write_error(e))?;
        self.state = State::Closed;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_str(&mut self, data: &str) -> Result<()> {
        self.out
            .write_all(data.as_bytes())
            .map_err(|e| self.write_error(e))?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    fn expect_state(&self, expected: State, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.state_error(action))
        }
    }

    fn state_error(&self, action: &'static str) -> ConvertError {
        ConvertError::WriterState {
            state: self.state.name(),
            action,
        }
    }

    fn write_error(&self, e: std::io::Error) -> ConvertError {
        ConvertError::WriteError {
            file: self.destination.clone(),
            reason: e.to_string(),
        }
    }
}

/// writer 단계 실행
///
/// `EndOfStream`을 받으면 배열을 닫고 반환합니다. 그 전에 채널이 끊기면
/// 닫는 괄호 없이 `StreamAborted`를 반환합니다.
pub fn consume(
    destination: &Path,
    rx: Receiver<Handoff>,
    style: JsonStyle,
    progress: &ProgressBar,
    stats: &Statistics,
) -> Result<()> {
    let file = File::create(destination).map_err(|e| ConvertError::FileCreateError {
        file: destination.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut writer = JsonArrayWriter::new(BufWriter::new(file), style, destination);

    progress.suspend(|| println!("Writing JSON file..."));
    writer.begin()?;

    loop {
        match rx.recv() {
            Ok(Handoff::Record(record)) => {
                writer.write_record(&record)?;
                stats.increment_written();
                progress.inc(1);
            }
            Ok(Handoff::EndOfStream) => break,
            Err(_) => return Err(ConvertError::StreamAborted),
        }
    }

    writer.finish()?;
    stats.add_bytes_written(writer.bytes_written());
    drop(writer);

    progress.suspend(|| println!("{}", "Complete!".green()));
    Ok(())
}
