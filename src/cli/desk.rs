//! Interactive buy desk: free text adds items, `:` commands edit settings.
use super::ui;
use crate::core::{ItemId, Ledger, MarketConfig, MetalKind};
use anyhow::{Context, Result, anyhow, bail};
use std::io::{BufRead, Write};
use tracing::{debug, info};

const HELP: &str = "\
Type an item description to add it, e.g. \"403g sterling silver\".
Commands:
  :rm <id>               remove an item
  :spot <metal> <price>  set a spot price per troy ounce
  :mult <metal> <value>  set a buyer multiplier (0 to 1)
  :round on|off          floor offers to the nearest $5
  :settings              show spot prices and multipliers
  :list                  show items and totals
  :clear                 remove all items
  :logout                end the signed-in session
  :quit                  leave the desk";

#[derive(Debug, Clone, PartialEq)]
pub enum DeskCommand {
    Add(String),
    Remove(ItemId),
    Spot(MetalKind, f64),
    Multiplier(MetalKind, f64),
    Rounding(bool),
    Settings,
    List,
    Clear,
    Help,
    Logout,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Continue(String),
    Logout,
    Quit,
}

/// Numeric settings input; anything unparsable or non-finite becomes 0.
pub fn coerce_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn coerce_spot(raw: &str) -> f64 {
    coerce_amount(raw).max(0.0)
}

pub fn coerce_multiplier(raw: &str) -> f64 {
    coerce_amount(raw).clamp(0.0, 1.0)
}

impl std::str::FromStr for DeskCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Ok(DeskCommand::Add(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        match (name.as_str(), args.as_slice()) {
            ("rm" | "remove", [id]) => {
                let id = id
                    .parse::<u64>()
                    .with_context(|| format!("Invalid item id: {id}"))?;
                Ok(DeskCommand::Remove(ItemId(id)))
            }
            ("spot", [metal, value]) => Ok(DeskCommand::Spot(metal.parse()?, coerce_spot(value))),
            ("mult" | "multiplier", [metal, value]) => Ok(DeskCommand::Multiplier(
                metal.parse()?,
                coerce_multiplier(value),
            )),
            ("round", [flag]) => match flag.to_lowercase().as_str() {
                "on" | "true" | "yes" => Ok(DeskCommand::Rounding(true)),
                "off" | "false" | "no" => Ok(DeskCommand::Rounding(false)),
                other => bail!("Expected on or off, got {other}"),
            },
            ("settings", []) => Ok(DeskCommand::Settings),
            ("list" | "ls", []) => Ok(DeskCommand::List),
            ("clear", []) => Ok(DeskCommand::Clear),
            ("help" | "h", []) => Ok(DeskCommand::Help),
            ("logout", []) => Ok(DeskCommand::Logout),
            ("quit" | "q" | "exit", []) => Ok(DeskCommand::Quit),
            _ => Err(anyhow!("Unknown command: {line} (type :help)")),
        }
    }
}

/// Ledger plus the market settings it is priced under.
pub struct Desk {
    market: MarketConfig,
    ledger: Ledger,
    currency: String,
}

impl Desk {
    pub fn new(market: MarketConfig, currency: &str) -> Self {
        Self {
            market,
            ledger: Ledger::new(),
            currency: currency.to_string(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn market(&self) -> &MarketConfig {
        &self.market
    }

    pub fn apply(&mut self, command: DeskCommand) -> Outcome {
        match command {
            DeskCommand::Add(text) => match self.ledger.add_item(&text, &self.market) {
                Ok(entry) => Outcome::Continue(format!(
                    "Added #{}: {}",
                    entry.id,
                    ui::format_money(entry.pay_price, &self.currency)
                )),
                Err(e) => Outcome::Continue(ui::style_text(&e.to_string(), ui::StyleType::Error)),
            },
            DeskCommand::Remove(id) => {
                if self.ledger.remove_item(id) {
                    Outcome::Continue(format!("Removed #{id}"))
                } else {
                    Outcome::Continue(format!("No item #{id}"))
                }
            }
            DeskCommand::Spot(metal, price) => {
                self.market.set_spot(metal, price);
                self.settings_changed(format!("{metal} spot set to {price:.2}"))
            }
            DeskCommand::Multiplier(metal, multiplier) => {
                self.market.set_multiplier(metal, multiplier);
                self.settings_changed(format!("{metal} multiplier set to {multiplier:.2}"))
            }
            DeskCommand::Rounding(enabled) => {
                self.market.rounding = enabled;
                let state = if enabled { "on" } else { "off" };
                self.settings_changed(format!("Rounding to nearest $5 {state}"))
            }
            DeskCommand::Settings => Outcome::Continue(self.display_settings()),
            DeskCommand::List => Outcome::Continue(self.display_quote()),
            DeskCommand::Clear => {
                self.ledger.clear();
                Outcome::Continue("Cleared all items".to_string())
            }
            DeskCommand::Help => Outcome::Continue(HELP.to_string()),
            DeskCommand::Logout => Outcome::Logout,
            DeskCommand::Quit => Outcome::Quit,
        }
    }

    fn settings_changed(&mut self, message: String) -> Outcome {
        info!("{message}");
        self.ledger.reprice(&self.market);
        Outcome::Continue(message)
    }

    pub fn display_quote(&self) -> String {
        if self.ledger.is_empty() {
            return ui::style_text("No items yet.", ui::StyleType::Subtle);
        }
        format!(
            "{}\n\n{}",
            self.ledger.display_as_table(&self.currency),
            self.ledger.totals().display(&self.currency)
        )
    }

    pub fn display_settings(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Metal"),
            ui::header_cell(&format!("Spot ({}/ozt)", self.currency)),
            ui::header_cell("Multiplier"),
        ]);
        for metal in MetalKind::ALL {
            table.add_row(vec![
                metal.to_string(),
                format!("{:.2}", self.market.spot(metal)),
                format!("{:.2}", self.market.multiplier(metal)),
            ]);
        }
        let rounding = if self.market.rounding { "ON" } else { "OFF" };
        format!("{table}\nRound to nearest $5: {rounding}")
    }
}

/// Reads commands until quit, logout or end of input.
pub fn run<R: BufRead, W: Write>(desk: &mut Desk, input: R, mut output: W) -> Result<Outcome> {
    writeln!(output, "{}", ui::style_text("Precious Metals Valuation", ui::StyleType::Title))?;
    writeln!(output, "{}", ui::style_text("Type :help for commands.", ui::StyleType::Subtle))?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let outcome = match line.parse::<DeskCommand>() {
            Ok(command) => {
                debug!(?command, "Desk command");
                desk.apply(command)
            }
            Err(e) => Outcome::Continue(ui::style_text(&e.to_string(), ui::StyleType::Error)),
        };

        match outcome {
            Outcome::Continue(message) => writeln!(output, "{message}")?,
            done => return Ok(done),
        }
    }
    Ok(Outcome::Quit)
}
