//! csv2json - CSV TO JSON CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use csv2json::{cli::Args, config::Config, pipeline, stats::Statistics, writer};

fn main() -> Result<()> {
    let args = parse_args();

    // 설정 검증 (실패 시 파이프라인 시작 전 종료)
    let config = Config::from_args(&args)?;

    if config.verbose {
        print_header(&config);
    }

    let stats = Statistics::new();
    let progress = create_progress_bar(config.progress);

    let report = pipeline::run(&config, &progress, &stats)
        .with_context(|| format!("failed to convert {}", config.input.display()))?;

    progress.finish_and_clear();

    if let Some(ref log_path) = config.log {
        println!(
            "\n{} 로그 저장 ({}행): {}",
            "📝".bright_cyan(),
            report.skipped,
            log_path.display()
        );
    }

    if config.verbose {
        stats.print_summary();
        println!(
            "\n{} 저장 완료: {}\n",
            "✅".bright_green(),
            report.output.display()
        );
    }

    Ok(())
}

/// CLI 인자 파싱
///
/// 사용법 오류는 종료 코드 1로 통일합니다. --help/--version은 그대로 처리합니다.
fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

/// 헤더 출력
fn print_header(config: &Config) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 CSV TO JSON CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!(
        "  {} 입력 파일: {}",
        "📂".bright_cyan(),
        config.input.display()
    );
    println!(
        "  {} 출력 파일: {}",
        "📄".bright_green(),
        writer::output_path(&config.input).display()
    );
    println!("  {} 구분자: {}", "⚙️".bright_yellow(), config.separator);

    if config.pretty {
        println!(
            "  {} {}",
            "✨".bright_magenta(),
            "Pretty 출력 모드".magenta()
        );
    }

    if let Some(ref log) = config.log {
        println!("  {} 로그 파일: {}", "📝".bright_cyan(), log.display());
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 진행률 스피너 생성
fn create_progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} records {msg}")
    {
        pb.set_style(style);
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_bar() {
        let pb = create_progress_bar(false);
        assert!(pb.is_hidden());
    }
}
