use serde::Serialize;

use crate::cli::OutputFormat;

pub mod table;

/// Human-readable rendering for `--format text`.
pub trait TextView {
    fn to_text(&self) -> String;
}

/// Render a response to a string in the requested format.
pub fn render<T: Serialize + TextView>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(value.to_text()),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a response in the requested format.
pub fn output<T: Serialize + TextView>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// A titled section: heading with a count, then a table or `(none)`.
pub fn section(title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return format!("{title} (0)\n  (none)");
    }
    let table = table::render_table(headers, rows, table::TableOptions::from_env());
    let indented = table
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{title} ({})\n{indented}", rows.len())
}
