//! Logger bootstrap.
//!
//! Log records go to an append-only file and are mirrored to stdout, one line
//! each: `<timestamp> - <LEVEL> - <message>`. `RUST_LOG` overrides the
//! configured level.

use flexi_logger::{DeferredNow, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle};
use log::Record;
use std::io::Write;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Start logging to `log_file` and stdout. Missing parent directories are
/// created. Keep the returned handle alive for as long as the process should
/// log.
pub fn init_logging(level: &str, log_file: &Path) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(level)?
        .log_to_file(file_spec(log_file)?)
        .append()
        .duplicate_to_stdout(Duplicate::All)
        .format(line_format)
        .start()
}

/// File spec for `log_file`. A bare file name lives in the working directory.
fn file_spec(log_file: &Path) -> Result<FileSpec, FlexiLoggerError> {
    match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => FileSpec::try_from(log_file),
        _ => FileSpec::try_from(Path::new(".").join(log_file)),
    }
}

/// `2026-10-17 09:30:00,123 - INFO - message`
pub fn line_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "{} - {} - {}",
        now.format(TIMESTAMP_FORMAT),
        record.level(),
        record.args()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use std::path::PathBuf;

    #[test]
    fn test_bare_file_name_logs_to_working_dir() {
        let spec = file_spec(Path::new("homework_bot.log")).unwrap();
        assert_eq!(spec.as_pathbuf(None), PathBuf::from("./homework_bot.log"));
    }

    #[test]
    fn test_nested_file_keeps_its_directory() {
        let spec = file_spec(Path::new("logs/bot.log")).unwrap();
        assert_eq!(spec.as_pathbuf(None), PathBuf::from("logs/bot.log"));
    }

    #[test]
    fn test_line_format() {
        let mut out = Vec::new();
        let mut now = DeferredNow::new();
        let record = Record::builder()
            .args(format_args!("no new statuses in API response"))
            .level(Level::Debug)
            .build();

        line_format(&mut out, &mut now, &record).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with(" - DEBUG - no new statuses in API response"), "{line}");
        // 2026-10-17 09:30:00,123
        let timestamp = line.split(" - ").next().unwrap();
        assert_eq!(timestamp.len(), 23, "{timestamp}");
    }
}
