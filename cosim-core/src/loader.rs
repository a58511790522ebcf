//! Parsers for the two external text formats the driver consumes: CSV-style
//! tables and `key = value` override files.

use crate::errors::{CosimError, CosimResult};
use crate::runner::InitOverrides;
use crate::table::Table;

/// Parse a table from CSV-style text.
///
/// The first non-empty line is the header and must start with a `time`
/// column; remaining columns name variables. Every data row must carry one
/// cell per header column.
pub fn table_from_csv(text: &str) -> CosimResult<Table> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| CosimError::MalformedTable("missing header row".to_string()))?;
    let mut columns = header.split(',').map(str::trim);
    match columns.next() {
        Some(first) if first.eq_ignore_ascii_case("time") => {}
        _ => {
            return Err(CosimError::MalformedTable(
                "first column must be 'time'".to_string(),
            ))
        }
    }
    let columns: Vec<String> = columns.map(str::to_string).collect();

    let mut table = Table::new(columns);
    for (number, line) in lines {
        let mut cells = line.split(',').map(str::trim);
        let time = cells.next().unwrap_or("");
        let time = time.parse().map_err(|_| {
            CosimError::MalformedTable(format!("line {}: bad time value {:?}", number + 1, time))
        })?;
        let cells: Vec<String> = cells.map(str::to_string).collect();
        if cells.len() != table.columns().len() {
            return Err(CosimError::MalformedTable(format!(
                "line {}: expected {} cells, got {}",
                number + 1,
                table.columns().len() + 1,
                cells.len() + 1
            )));
        }
        table.push_row(time, cells)?;
    }
    Ok(table)
}

/// Parse initial overrides from `key = value` lines.
///
/// Blank lines and lines starting with `#` are ignored; whitespace around
/// keys and values is trimmed. Order is preserved.
pub fn overrides_from_properties(text: &str) -> CosimResult<InitOverrides> {
    let mut overrides = InitOverrides::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| {
            CosimError::MalformedTable(format!("line {}: expected 'key = value'", number + 1))
        })?;
        overrides.push((key.trim().to_string(), value.trim().to_string()));
    }
    Ok(overrides)
}
