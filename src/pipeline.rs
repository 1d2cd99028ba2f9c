//! 변환 파이프라인 모듈
//!
//! reader/writer 두 단계를 용량 0 채널로 연결하여 실행하고 결과를 모읍니다.

use indicatif::ProgressBar;
use std::io::Read;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::json_style::JsonStyle;
use crate::reader::{self, RowReader};
use crate::record::Record;
use crate::stats::Statistics;
use crate::writer;

/// reader에서 writer로 넘어가는 항목
#[derive(Debug)]
pub enum Handoff {
    Record(Record),
    /// 입력을 끝까지 읽었음
    EndOfStream,
}

/// 파이프라인 실행 결과
#[derive(Debug)]
pub struct PipelineReport {
    /// 생성된 JSON 파일 경로
    pub output: PathBuf,
    /// 건너뛴 행 수
    pub skipped: u64,
}

/// 변환 실행
///
/// 두 단계를 각각의 스레드에서 돌리고 writer 완료를 기다립니다.
/// 어느 한쪽이 실패하면 근본 원인 에러를 반환합니다.
pub fn run(config: &Config, progress: &ProgressBar, stats: &Statistics) -> Result<PipelineReport> {
    run_with_source(
        config,
        || RowReader::open(&config.input, config.separator),
        progress,
        stats,
    )
}

/// 소스 열기를 reader 스레드 안에서 수행하며 변환 실행
fn run_with_source<R, F>(
    config: &Config,
    open: F,
    progress: &ProgressBar,
    stats: &Statistics,
) -> Result<PipelineReport>
where
    R: Read,
    F: FnOnce() -> Result<RowReader<R>> + Send,
{
    let output = writer::output_path(&config.input);
    let destination = output.as_path();
    let style = JsonStyle::from_pretty(config.pretty);

    // 용량 0: writer가 받을 때까지 reader가 대기
    let (tx, rx) = mpsc::sync_channel::<Handoff>(0);

    let (read_result, write_result) = thread::scope(|scope| {
        let reader_handle = scope.spawn(move || {
            let rows = open()?;
            reader::produce(rows, config.log.as_deref(), tx, progress, stats)
        });
        let writer_handle =
            scope.spawn(move || writer::consume(destination, rx, style, progress, stats));

        let write_result = writer_handle
            .join()
            .unwrap_or(Err(ConvertError::StagePanicked { stage: "writer" }));
        let read_result = reader_handle
            .join()
            .unwrap_or(Err(ConvertError::StagePanicked { stage: "reader" }));

        (read_result, write_result)
    });

    match (read_result, write_result) {
        (Ok(skipped), Ok(())) => Ok(PipelineReport { output, skipped }),
        (Err(read_err), Err(write_err)) => {
            if read_err.is_derivative() {
                Err(write_err)
            } else {
                Err(read_err)
            }
        }
        (Err(e), Ok(())) | (Ok(_), Err(e)) => Err(e),
    }
}

/// 진행률 표시 없이 변환 실행 (라이브러리 사용용)
pub fn convert_file(config: &Config) -> Result<PipelineReport> {
    let stats = Statistics::new();
    run(config, &ProgressBar::hidden(), &stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Separator;
    use std::fs;
    use tempfile::TempDir;

    fn create_csv(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_run_compact() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_csv(temp_dir.path(), "data.csv", "a,b\n1,2\n3,4");

        let stats = Statistics::new();
        let config = Config::new(&path, Separator::Comma, false);
        let report = run(&config, &ProgressBar::hidden(), &stats).unwrap();

        assert_eq!(report.output, temp_dir.path().join("data.json"));
        assert_eq!(report.skipped, 0);
        assert_eq!(
            fs::read_to_string(&report.output).unwrap(),
            r#"[{"a":"1","b":"2"},{"a":"3","b":"4"}]"#
        );
        assert_eq!(stats.get_rows_read(), 2);
        assert_eq!(stats.get_records_written(), 2);
    }

    #[test]
    fn test_run_counts_skipped_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_csv(temp_dir.path(), "data.csv", "a,b\n1,2\n3\n4,5,6\n7,8\n");

        let stats = Statistics::new();
        let config = Config::new(&path, Separator::Comma, false);
        let report = run(&config, &ProgressBar::hidden(), &stats).unwrap();

        assert_eq!(report.skipped, 2);
        assert_eq!(stats.get_rows_read(), 4);
        assert_eq!(stats.get_rows_skipped(), 2);
        assert_eq!(
            stats.get_records_written(),
            stats.get_rows_read() - stats.get_rows_skipped()
        );
    }

    #[test]
    fn test_run_empty_input_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_csv(temp_dir.path(), "empty.csv", "");

        let err = convert_file(&Config::new(&path, Separator::Comma, false)).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyInput { .. }));
    }

    #[test]
    fn test_invalid_utf8_converted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.csv");
        fs::write(&path, b"name,city\nRen\xe9,Paris\n".as_slice()).unwrap();

        let report = convert_file(&Config::new(&path, Separator::Comma, false)).unwrap();
        assert_eq!(
            fs::read_to_string(report.output).unwrap(),
            "[{\"city\":\"Paris\",\"name\":\"Ren\u{fffd}\"}]"
        );
    }

    /// 데이터를 다 내보낸 뒤 I/O 에러를 내는 소스
    struct FailingSource {
        data: &'static [u8],
        pos: usize,
    }

    impl Read for FailingSource {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let remaining = &self.data[self.pos..];
            if remaining.is_empty() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "device error",
                ));
            }
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_reader_failure_leaves_array_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.csv");
        let config = Config::new(&path, Separator::Comma, false);

        let open = || {
            let source = FailingSource {
                data: b"a,b\n1,2\n",
                pos: 0,
            };
            RowReader::from_reader(source, Separator::Comma, &path)
        };
        let err = run_with_source(&config, open, &ProgressBar::hidden(), &Statistics::new())
            .unwrap_err();
        assert!(matches!(err, ConvertError::ReadError { .. }));

        let partial = fs::read_to_string(temp_dir.path().join("broken.json")).unwrap();
        assert_eq!(partial, r#"[{"a":"1","b":"2"}"#);
    }

    #[test]
    fn test_skipped_rows_not_retained_without_log() {
        let temp_dir = TempDir::new().unwrap();
        let mut csv = String::from("a,b\n");
        for i in 0..1000 {
            csv.push_str(&format!("{};{}\n", i, i));
        }
        let path = create_csv(temp_dir.path(), "data.csv", &csv);

        let report = convert_file(&Config::new(&path, Separator::Comma, false)).unwrap();

        assert_eq!(report.skipped, 1000);
        assert_eq!(fs::read_to_string(&report.output).unwrap(), "[]");
        // 출력 JSON과 입력 CSV 외에 생성된 파일이 없어야 함
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_skipped_rows_streamed_to_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_csv(temp_dir.path(), "data.csv", "a,b\n1,2\n3\n\"x,y\",z,w\n");
        let log_path = temp_dir.path().join("skipped.log");

        let mut config = Config::new(&path, Separator::Comma, false);
        config.log = Some(log_path.clone());
        let report = convert_file(&config).unwrap();

        assert_eq!(report.skipped, 2);
        let log = fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("줄: 3"));
        assert!(log.contains("내용: \"x,y\",z,w"));
        assert!(log.contains("건너뛴 행 수: 2"));
    }

    #[test]
    fn test_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.csv");

        let err = convert_file(&Config::new(&path, Separator::Comma, false)).unwrap_err();
        assert!(matches!(err, ConvertError::FileOpenError { .. }));
    }
}
