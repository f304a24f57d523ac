//! Command line definition.
//!
//! ```text
//! brew [--config FILE] [--database PATH] [--json] <COMMAND>
//!
//!   ingredient  list | show | add | set | remove | clear
//!   recipe      list | show | add | update | remove | clear
//!   quote       --item RECIPE=COUNT ...
//!   purchase    --item RECIPE=COUNT ... --pay AMOUNT
//! ```

use std::path::PathBuf;

use brew_core::{Money, Quantity, RecipeIngredient, SelectionLine};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "brew", version, about = "Coffee shop inventory, menu and checkout")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides config and BREW_DATABASE_PATH)
    #[arg(long, value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the ingredient inventory
    #[command(subcommand)]
    Ingredient(IngredientCommand),

    /// Manage the recipe menu
    #[command(subcommand)]
    Recipe(RecipeCommand),

    /// Price a selection and check it against stock
    Quote(SelectionArgs),

    /// Price, pay for and commit a selection
    Purchase {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Amount tendered, e.g. 10 or 10.50
        #[arg(long, value_name = "AMOUNT")]
        pay: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct SelectionArgs {
    /// Recipe id (or name) and count; repeat for more recipes
    #[arg(long = "item", value_name = "RECIPE=COUNT", value_parser = parse_item, required = true)]
    pub items: Vec<SelectionLine>,
}

#[derive(Debug, Subcommand)]
pub enum IngredientCommand {
    /// List every ingredient
    List,

    /// Show one ingredient
    Show { id: String },

    /// Add an ingredient with its starting stock
    Add {
        name: String,
        #[arg(value_parser = parse_quantity)]
        amount: Quantity,
    },

    /// Set the on-hand amount of an ingredient
    Set {
        id: String,
        #[arg(value_parser = parse_quantity)]
        amount: Quantity,
    },

    /// Rename an ingredient; recipes that use it follow the new name
    Rename { id: String, name: String },

    /// Delete an ingredient
    Remove { id: String },

    /// Delete every ingredient
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum RecipeCommand {
    /// List every recipe
    List,

    /// Show one recipe with its requirements
    Show { id: String },

    /// Add a recipe
    Add {
        name: String,
        #[arg(value_parser = parse_money)]
        price: Money,

        /// Ingredient name and amount per unit; repeat for each ingredient
        #[arg(long = "requires", value_name = "NAME=AMOUNT", value_parser = parse_requirement)]
        requires: Vec<RecipeIngredient>,
    },

    /// Replace fields of a recipe; omitted fields are kept
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_parser = parse_money)]
        price: Option<Money>,

        /// Replaces the whole requirement list when given
        #[arg(long = "requires", value_name = "NAME=AMOUNT", value_parser = parse_requirement)]
        requires: Vec<RecipeIngredient>,
    },

    /// Delete a recipe
    Remove { id: String },

    /// Delete every recipe
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

// =============================================================================
// Value Parsers
// =============================================================================

fn split_pair<'a>(raw: &'a str, what: &str) -> Result<(&'a str, &'a str), String> {
    raw.rsplit_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected {what}, got '{raw}'"))
}

/// `RECIPE=COUNT`. A non-numeric count is kept so the quote rejects it by name.
pub fn parse_item(raw: &str) -> Result<SelectionLine, String> {
    let (recipe, count) = split_pair(raw, "RECIPE=COUNT")?;
    Ok(SelectionLine::from_input(recipe, true, count))
}

/// `NAME=AMOUNT`, amount in units with up to three decimals.
pub fn parse_requirement(raw: &str) -> Result<RecipeIngredient, String> {
    let (name, amount) = split_pair(raw, "NAME=AMOUNT")?;
    Ok(RecipeIngredient::new(name, parse_quantity(amount)?))
}

pub fn parse_quantity(raw: &str) -> Result<Quantity, String> {
    Quantity::parse(raw).map_err(|e| e.to_string())
}

pub fn parse_money(raw: &str) -> Result<Money, String> {
    Money::parse(raw).map_err(|e| e.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
