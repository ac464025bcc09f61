use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref LOG_NAME: Regex = Regex::new(r"^nginx-access-ui\.log-(\d{8})(\.gz)?$").unwrap();
}

/// A selected log file plus the date token embedded in its filename
///
/// The date token orders candidates (lexicographic == chronological) and
/// names the report the file will produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileRef {
    pub path: PathBuf,
    pub date_key: String,
}

impl LogFileRef {
    /// Whether the file is gzip-compressed, judged by the `.gz` suffix
    pub fn is_gzip(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "gz")
    }

    /// The date token formatted for the report filename (YYYY.MM.DD)
    pub fn report_date(&self) -> String {
        format!(
            "{}.{}.{}",
            &self.date_key[..4],
            &self.date_key[4..6],
            &self.date_key[6..8]
        )
    }
}

/// Digit-range plausibility check on the date token: month 01-12, day 01-31.
/// Not full calendar validation.
fn plausible_date(date_key: &str) -> bool {
    let month: u32 = match date_key[4..6].parse() {
        Ok(month) => month,
        Err(_) => return false,
    };
    let day: u32 = match date_key[6..8].parse() {
        Ok(day) => day,
        Err(_) => return false,
    };
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Pick the log file with the greatest embedded date from `log_dir`.
///
/// Returns `Ok(None)` when nothing matches - a clean no-op for the caller,
/// not an error. Entries matching the name pattern but carrying an
/// implausible date token are skipped. When two files share the maximal
/// date the lexicographically smallest filename wins, so the choice never
/// depends on directory iteration order.
pub fn select_latest(log_dir: &Path) -> Result<Option<LogFileRef>> {
    // (date_key, file_name) of the best candidate so far
    let mut best: Option<(String, String)> = None;

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            // a non-UTF-8 name cannot match the pattern
            Err(_) => continue,
        };
        let captures = match LOG_NAME.captures(&name) {
            Some(captures) => captures,
            None => continue,
        };
        let date_key = captures[1].to_string();
        if !plausible_date(&date_key) {
            tracing::debug!("Skipping {}: implausible date token {}", name, date_key);
            continue;
        }

        let newer = match &best {
            None => true,
            Some((best_key, best_name)) => {
                date_key > *best_key || (date_key == *best_key && name < *best_name)
            }
        };
        if newer {
            best = Some((date_key, name));
        }
    }

    Ok(best.map(|(date_key, name)| {
        tracing::info!("Selected log {} (date {})", name, date_key);
        LogFileRef {
            path: log_dir.join(&name),
            date_key,
        }
    }))
}
