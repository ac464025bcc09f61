use crate::analysis::Report;
use crate::{Error, Result};

/// Placeholder a template must carry; replaced with the JSON row array
const PLACEHOLDER: &str = "$table_json";

/// Self-contained report page shipped with the crate
pub const DEFAULT_TEMPLATE: &str = include_str!("../../assets/report.html");

/// Substitute the ranked rows into an HTML template as a JSON array.
///
/// Callers may pass their own template as long as it carries the
/// `$table_json` placeholder; a template without it is rejected rather
/// than silently producing a data-less page.
pub fn render(report: &Report, template: &str) -> Result<String> {
    if !template.contains(PLACEHOLDER) {
        return Err(Error::Template(PLACEHOLDER));
    }

    let rows = serde_json::to_string(&report.entries)?;
    tracing::debug!("Rendered {} report rows into template", report.entries.len());
    Ok(template.replace(PLACEHOLDER, &rows))
}
