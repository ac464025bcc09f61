use crate::Result;
use crate::logs::LogFileRef;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write the rendered page to `<report_dir>/report-YYYY.MM.DD.html`.
///
/// The page lands in a temporary sibling first and is renamed into place,
/// so an interrupted run never leaves a partial report behind.
pub fn write_report(html: &str, report_dir: &Path, log: &LogFileRef) -> Result<PathBuf> {
    let report_path = report_dir.join(format!("report-{}.html", log.report_date()));
    let tmp_path = report_path.with_extension("html.tmp");

    {
        let file = fs::File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(html.as_bytes())?;
        writer.flush()?;
    }
    fs::rename(&tmp_path, &report_path)?;

    tracing::info!("Wrote report to {}", report_path.display());
    Ok(report_path)
}
