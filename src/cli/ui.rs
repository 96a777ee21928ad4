use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Bold green, right aligned money cell. Zero offers are dimmed.
pub fn price_cell(amount: f64, currency: &str) -> Cell {
    let cell = Cell::new(format_money(amount, currency)).set_alignment(CellAlignment::Right);
    if amount > 0.0 {
        cell.add_attribute(Attribute::Bold).fg(Color::Green)
    } else {
        cell.fg(Color::DarkGrey)
    }
}

pub fn format_money(amount: f64, currency: &str) -> String {
    format!("${amount:.2} {currency}")
}

/// Fineness as a percentage with one decimal, e.g. 0.925 -> "92.5%".
pub fn format_purity(purity: f64) -> String {
    format!("{:.1}%", purity * 100.0)
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(27.056, "CAD"), "$27.06 CAD");
        assert_eq!(format_money(0.0, "USD"), "$0.00 USD");
    }

    #[test]
    fn test_format_purity() {
        assert_eq!(format_purity(0.925), "92.5%");
        assert_eq!(format_purity(0.9167), "91.7%");
        assert_eq!(format_purity(1.0), "100.0%");
    }
}
