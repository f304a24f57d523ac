//! Command handlers.
//!
//! Handlers are generic over the store traits and return an [`Output`];
//! `main` wires them to SQLite, tests to [`brew_db::MemoryStore`].

pub mod checkout;
pub mod ingredient;
pub mod recipe;

use brew_db::{Checkout, IngredientStore, RecipeCatalog};

use crate::cli::Command;
use crate::output::{Formatter, Output};

/// Runs one parsed command.
pub async fn dispatch<S, C>(stock: &S, catalog: &C, fmt: &Formatter, command: Command) -> anyhow::Result<Output>
where
    S: IngredientStore + Clone,
    C: RecipeCatalog + Clone,
{
    match command {
        Command::Ingredient(cmd) => ingredient::run(stock, catalog, fmt, cmd).await,
        Command::Recipe(cmd) => recipe::run(stock, catalog, fmt, cmd).await,
        Command::Quote(selection) => {
            let checkout = Checkout::new(stock.clone(), catalog.clone());
            checkout::quote(&checkout, fmt, selection.items).await
        }
        Command::Purchase { selection, pay } => {
            let checkout = Checkout::new(stock.clone(), catalog.clone());
            checkout::purchase(&checkout, fmt, selection.items, pay).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brew_db::{Database, DbConfig};
    use clap::Parser;

    use crate::cli::Cli;

    async fn exec(db: &Database, args: &[&str]) -> anyhow::Result<Output> {
        let mut argv = vec!["brew"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        dispatch(&db.ingredients(), &db.recipes(), &Formatter::new("$"), cli.command).await
    }

    #[tokio::test]
    async fn test_shop_session_against_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        exec(&db, &["ingredient", "add", "Milk", "500"]).await.unwrap();
        exec(&db, &["ingredient", "add", "Coffee", "100"]).await.unwrap();
        exec(&db, &["recipe", "add", "Latte", "3.50", "--requires", "Milk=100", "--requires", "Coffee=10"])
            .await
            .unwrap();
        exec(&db, &["recipe", "add", "Espresso", "2", "--requires", "Coffee=10"])
            .await
            .unwrap();

        let quote = exec(&db, &["quote", "--item", "latte=2", "--item", "espresso=1"]).await.unwrap();
        assert_eq!(quote.json()["totalPrice"], 900);

        let receipt = exec(&db, &["purchase", "--item", "latte=2", "--item", "espresso=1", "--pay", "10"])
            .await
            .unwrap();
        assert_eq!(receipt.json()["settlement"]["change"], 100);
        assert_eq!(receipt.json()["settlement"]["updatedIngredients"]["Milk"], 300_000);

        let listed = exec(&db, &["ingredient", "list"]).await.unwrap();
        assert!(listed.text().contains("Coffee"));
        assert_eq!(listed.json()[1]["amount"], 70_000);
    }

    #[tokio::test]
    async fn test_invalid_count_is_reported_by_recipe() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        exec(&db, &["ingredient", "add", "Coffee", "100"]).await.unwrap();
        exec(&db, &["recipe", "add", "Espresso", "2", "--requires", "Coffee=10"])
            .await
            .unwrap();

        let err = exec(&db, &["quote", "--item", "espresso=0"]).await.unwrap_err();
        let failure = crate::report::classify(&err);
        assert_eq!(failure.code, "INVALID_COUNT");
    }
}
