use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Row as ComfyRow, Table};
use serde::Serialize;
use terminal_size::{Width as TermWidth, terminal_size};
use unicode_width::UnicodeWidthStr;

use super::{Cli, OutputFormat};

#[derive(Debug, Clone, Serialize)]
pub(super) struct KeyValueRow {
    pub key: String,
    pub value: String,
}

impl TableRow for KeyValueRow {
    const HEADERS: &'static [&'static str] = &["key", "value"];

    fn values(&self) -> Vec<String> {
        vec![self.key.clone(), self.value.clone()]
    }
}

/// One renderable row. `values` carries the full untruncated data and feeds
/// CSV output; `cells` may shorten or colorize for tables.
pub(super) trait TableRow {
    const HEADERS: &'static [&'static str];

    fn values(&self) -> Vec<String>;

    fn cells(&self) -> Vec<Cell> {
        self.values().into_iter().map(Cell::new).collect()
    }
}

pub(super) fn terminal_width() -> Option<u16> {
    if let Ok(cols) = std::env::var("COLUMNS")
        && let Ok(v) = cols.parse::<u16>()
    {
        return Some(v);
    }
    terminal_size().map(|(TermWidth(w), _)| w)
}

pub(super) fn shorten_id_for_table(id: &str) -> String {
    let id = id.trim();
    let max = 18usize;
    if id.is_empty() || id.width() <= max {
        return id.to_string();
    }
    // Keep enough context to copy/paste from JSON output, but make tables readable.
    let prefix_len = 8usize;
    let suffix_len = 6usize;
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= prefix_len + suffix_len + 1 {
        return id.to_string();
    }
    let prefix: String = chars[..prefix_len].iter().collect();
    let suffix: String = chars[chars.len() - suffix_len..].iter().collect();
    format!("{prefix}…{suffix}")
}

#[cfg(test)]
mod tests {
    use super::shorten_id_for_table;

    #[test]
    fn shorten_id_keeps_short_ids_and_truncates_long_ones() {
        assert_eq!(shorten_id_for_table("abc123"), "abc123");
        assert_eq!(
            shorten_id_for_table("100000000000000001"),
            "100000000000000001"
        );

        let long = "a".repeat(30);
        let short = shorten_id_for_table(&long);
        assert_eq!(short, format!("{}…{}", "a".repeat(8), "a".repeat(6)));
    }

    #[test]
    fn shorten_id_respects_char_boundaries_in_multibyte_ids() {
        let long = "é".repeat(30);
        let short = shorten_id_for_table(&long);
        assert_eq!(short, format!("{}…{}", "é".repeat(8), "é".repeat(6)));
    }
}

pub(super) fn render_rows<T: TableRow>(cli: &Cli, rows: &[T]) -> anyhow::Result<()> {
    match cli.output {
        OutputFormat::Json => unreachable!("json output is handled per-command"),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(T::HEADERS)?;
            for row in rows {
                writer.write_record(row.values())?;
            }
            let buf = writer
                .into_inner()
                .map_err(|e| anyhow::anyhow!("csv flush failed: {e}"))?;
            let out = String::from_utf8(buf)?;
            print!("{out}");
            Ok(())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::DynamicFullWidth);

            if let Some(w) = terminal_width() {
                table.set_width(w);
            }

            table.set_header(ComfyRow::from(
                T::HEADERS
                    .iter()
                    .map(|h| header_cell(cli, h))
                    .collect::<Vec<_>>(),
            ));
            for row in rows {
                table.add_row(ComfyRow::from(row.cells()));
            }
            println!("{table}");
            Ok(())
        }
    }
}

pub(super) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

pub(super) fn header_cell(cli: &Cli, text: &str) -> Cell {
    if super::should_color(cli) {
        Cell::new(text)
            .add_attribute(Attribute::Bold)
            .fg(Color::Cyan)
    } else {
        Cell::new(text)
    }
}
