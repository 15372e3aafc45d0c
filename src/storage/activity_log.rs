use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::trace;

use crate::utils::{clock::Clock, dir::ensure_dir, time::format_timestamp};

/// Human readable history of every change made to routines. It's only ever written to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn append(&self, message: &str) -> Result<()>;
}

/// Appends `<timestamp>: <message>` lines to a text file.
pub struct FileActivityLog {
    path: PathBuf,
    clock: Box<dyn Clock>,
}

impl FileActivityLog {
    pub fn new(path: PathBuf, clock: Box<dyn Clock>) -> Self {
        Self { path, clock }
    }
}

#[async_trait]
impl ActivityLog for FileActivityLog {
    async fn append(&self, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|v| !v.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let line = format!("{}: {message}\n", format_timestamp(self.clock.now()));

        let mut file = File::options()
            .append(true)
            .create(true)
            .open(&self.path)
            .await?;

        file.lock_exclusive()?;
        let result = file.write_all(line.as_bytes()).await;
        let result = match result {
            Ok(_) => file.flush().await,
            Err(e) => Err(e),
        };
        file.unlock_async().await?;
        trace!("Logged activity {message:?}");
        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, NaiveDate};
    use tempfile::tempdir;

    use crate::utils::clock::test_clock::FixedClock;

    use super::{ActivityLog, FileActivityLog};

    #[tokio::test]
    async fn test_lines_are_appended() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("activity_log.txt");
        let clock = FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 5, 10)
                .unwrap()
                .and_hms_micro_opt(6, 30, 15, 250)
                .unwrap(),
        );
        let log = FileActivityLog::new(path.clone(), Box::new(clock.clone()));

        log.append("Completed routine: Meditate").await?;
        clock.advance(Duration::days(1));
        log.append("Completed routine: Read").await?;

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(
            content,
            "2024-05-10 06:30:15.000250: Completed routine: Meditate\n\
             2024-05-11 06:30:15.000250: Completed routine: Read\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_existing_log_is_kept() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("activity_log.txt");
        std::fs::write(&path, "earlier line\n")?;
        let clock = FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 5, 10)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
        );
        let log = FileActivityLog::new(path.clone(), Box::new(clock));

        log.append("Added routine: Read").await?;

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 2);
        assert!(content.starts_with("earlier line\n"));
        Ok(())
    }
}
