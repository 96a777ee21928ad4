use super::ui;
use crate::core::{Ledger, MarketConfig, MetalKind, ParseError, ParsedItem, Totals, valuate};
use anyhow::Result;
use comfy_table::{Cell, Color};
use tracing::warn;

impl Ledger {
    pub fn display_as_table(&self, currency: &str) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("ID"),
            ui::header_cell("Item"),
            ui::header_cell("Metal"),
            ui::header_cell("Purity"),
            ui::header_cell("Weight"),
            ui::header_cell(&format!("Offer ({currency})")),
        ]);

        for entry in self.items() {
            let (name, symbol) = entry.metal.display_info();
            let weight = match (entry.item.weight, entry.item.face_value) {
                (_, Some(face)) => Some(format!("${face:.2} face")),
                (Some(weight), None) => Some(weight.to_string()),
                (None, None) => None,
            };

            table.add_row(vec![
                Cell::new(entry.id).fg(Color::DarkGrey),
                Cell::new(&entry.item.original_text),
                Cell::new(format!("{name} ({symbol})")),
                ui::format_optional_cell(entry.item.purity, ui::format_purity),
                ui::format_optional_cell(weight, |w| w),
                ui::price_cell(entry.pay_price, currency),
            ]);
        }

        table.to_string()
    }
}

impl Totals {
    /// Metals with a positive total, then the grand total.
    pub fn display(&self, currency: &str) -> String {
        let mut output = String::new();
        for metal in MetalKind::ALL {
            let total = self.metal(metal);
            if total > 0.0 {
                let (name, symbol) = metal.display_info();
                output.push_str(&format!(
                    "{:<16}{:>16}\n",
                    format!("{name} ({symbol})"),
                    ui::format_money(total, currency)
                ));
            }
        }

        output.push_str(&format!(
            "{}: {}",
            ui::style_text("Grand Total", ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::format_money(self.grand, currency),
                ui::StyleType::TotalValue
            )
        ));
        output
    }
}

/// Table of parse results with the pricing breakdown for each.
pub fn display_parsed(items: &[ParsedItem], market: &MarketConfig, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Input"),
        ui::header_cell("Metal"),
        ui::header_cell("Purity"),
        ui::header_cell("Weight"),
        ui::header_cell("Face value"),
        ui::header_cell("Fine ozt"),
        ui::header_cell("Melt"),
        ui::header_cell(&format!("Offer ({currency})")),
    ]);

    for item in items {
        let valuation = valuate(item, market);
        let metal = item.metal.map(|m| m.to_string());
        table.add_row(vec![
            Cell::new(&item.original_text),
            ui::format_optional_cell(metal, |m| m),
            ui::format_optional_cell(item.purity, ui::format_purity),
            ui::format_optional_cell(item.weight, |w| w.to_string()),
            ui::format_optional_cell(item.face_value, |f| format!("${f:.2}")),
            ui::format_optional_cell(Some(valuation.fine_ozt), |v| format!("{v:.4}")),
            ui::format_optional_cell(Some(valuation.melt_value), |v| format!("{v:.2}")),
            ui::price_cell(valuation.offer, currency),
        ]);
    }

    table.to_string()
}

/// Prices each non-blank line into a ledger, returning the lines that were
/// rejected alongside it.
pub fn build_quote(lines: &[String], market: &MarketConfig) -> (Ledger, Vec<ParseError>) {
    let mut ledger = Ledger::new();
    let mut rejected = Vec::new();

    for line in lines.iter().filter(|l| !l.trim().is_empty()) {
        if let Err(e) = ledger.add_item(line, market) {
            warn!("Skipping line: {e}");
            rejected.push(e);
        }
    }
    (ledger, rejected)
}

/// Prices each line and prints the resulting quote. Lines without a metal
/// are reported and skipped.
pub fn run(lines: &[String], market: &MarketConfig, currency: &str) -> Result<()> {
    let (ledger, rejected) = build_quote(lines, market);

    for e in &rejected {
        eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
    }

    if ledger.is_empty() {
        println!("No items to quote.");
        return Ok(());
    }

    println!(
        "Quote: {}\n",
        ui::style_text(&format!("{} item(s)", ledger.len()), ui::StyleType::Title)
    );
    println!("{}", ledger.display_as_table(currency));
    println!();
    println!("{}", ledger.totals().display(currency));
    Ok(())
}
