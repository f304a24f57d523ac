//! Text and JSON rendering of command results.
//!
//! Every command produces an [`Output`] holding both forms; `--json`
//! picks which one reaches stdout.

use std::fmt::Write as _;

use brew_core::{Ingredient, Money, PurchaseQuote, Recipe, SettlementResult};
use serde::Serialize;
use serde_json::Value;

/// A command result, ready to print.
#[derive(Debug, Clone)]
pub struct Output {
    text: String,
    json: Value,
}

impl Output {
    pub fn new<T: Serialize>(value: &T, text: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Output {
            text: text.into(),
            json: serde_json::to_value(value)?,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn render(&self, json: bool) -> anyhow::Result<String> {
        if json {
            Ok(serde_json::to_string_pretty(self.json())?)
        } else {
            Ok(self.text().to_string())
        }
    }
}

/// Human-readable formatting with the configured currency symbol.
#[derive(Debug, Clone)]
pub struct Formatter {
    currency: String,
}

impl Formatter {
    pub fn new(currency: impl Into<String>) -> Self {
        Formatter {
            currency: currency.into(),
        }
    }

    pub fn money(&self, amount: Money) -> String {
        format!("{}{}", self.currency, amount.to_decimal_string())
    }

    pub fn ingredient(&self, ingredient: &Ingredient) -> String {
        format!("{}  {:<24} {}", ingredient.id, ingredient.name, ingredient.amount)
    }

    pub fn ingredients(&self, ingredients: &[Ingredient]) -> String {
        if ingredients.is_empty() {
            return "No ingredients.".to_string();
        }
        lines(ingredients.iter().map(|i| self.ingredient(i)))
    }

    pub fn recipe_summary(&self, recipe: &Recipe) -> String {
        let mut line = format!("{}  {:<24} {:>9}", recipe.id, recipe.name, self.money(recipe.price));
        if let Some(reason) = recipe.unpurchasable_reason() {
            let _ = write!(line, "  (not for sale: {reason})");
        }
        line
    }

    pub fn recipes(&self, recipes: &[Recipe]) -> String {
        if recipes.is_empty() {
            return "No recipes.".to_string();
        }
        lines(recipes.iter().map(|r| self.recipe_summary(r)))
    }

    pub fn recipe_detail(&self, recipe: &Recipe) -> String {
        let mut out = self.recipe_summary(recipe);
        for requirement in &recipe.recipe_ingredients {
            let _ = write!(out, "\n    {:<24} {}", requirement.name, requirement.amount);
        }
        out
    }

    pub fn quote(&self, quote: &PurchaseQuote) -> String {
        let mut out = String::new();
        for line in &quote.lines {
            let _ = writeln!(
                out,
                "{:>4} x {:<24} {:>9}",
                line.quantity,
                line.recipe.name,
                self.money(line.line_total)
            );
        }
        let _ = write!(out, "{:>31} {:>9}", "Total", self.money(quote.total_price));
        out
    }

    pub fn receipt(&self, quote: &PurchaseQuote, settlement: &SettlementResult) -> String {
        let mut out = self.quote(quote);
        let _ = write!(
            out,
            "\n{:>31} {:>9}\n{:>31} {:>9}",
            "Paid",
            self.money(settlement.tendered),
            "Change",
            self.money(settlement.change)
        );
        for (name, remaining) in &settlement.updated_ingredients {
            let _ = write!(out, "\n  {name} now {remaining}");
        }
        out
    }
}

fn lines(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join("\n")
}
