//! # Seed Data Generator
//!
//! Fills a database with a small coffee-shop inventory and menu for
//! development and demos.
//!
//! ## Usage
//! ```bash
//! # Built-in demo data
//! cargo run -p brew-db --bin seed
//!
//! # Specify database path
//! cargo run -p brew-db --bin seed -- --db ./data/brew.db
//!
//! # Load inventory and menu from a JSON file
//! cargo run -p brew-db --bin seed -- --from menu.json
//! ```
//!
//! ## JSON Format
//! Amounts are thousandths of a unit, prices are cents (the wire format of
//! `Quantity` and `Money`):
//! ```json
//! {
//!   "ingredients": [{ "name": "Milk", "amount": 2000000 }],
//!   "recipes": [{
//!     "name": "Latte",
//!     "price": 350,
//!     "recipeIngredients": [{ "name": "Milk", "amount": 100000 }]
//!   }]
//! }
//! ```

use std::env;

use brew_core::validation::{validate_ingredient_amount, validate_ingredient_name, validate_new_recipe};
use brew_core::{Money, NewRecipe, Quantity, RecipeIngredient};
use brew_db::{Database, DbConfig, IngredientStore, RecipeCatalog};
use serde::Deserialize;

/// Ingredient name and starting stock in whole units.
const INGREDIENTS: &[(&str, i64)] = &[
    ("Coffee", 1_000),
    ("Milk", 4_000),
    ("Sugar", 500),
    ("Chocolate", 300),
    ("Tea", 200),
    ("Cinnamon", 50),
];

/// Recipe name, price in cents, requirements in whole units.
const RECIPES: &[(&str, i64, &[(&str, i64)])] = &[
    ("Espresso", 250, &[("Coffee", 18)]),
    ("Latte", 350, &[("Coffee", 18), ("Milk", 200)]),
    ("Cappuccino", 325, &[("Coffee", 18), ("Milk", 120)]),
    ("Mocha", 400, &[("Coffee", 18), ("Milk", 180), ("Chocolate", 25), ("Sugar", 5)]),
    ("Chai Latte", 375, &[("Tea", 3), ("Milk", 200), ("Cinnamon", 1), ("Sugar", 10)]),
];

#[derive(Debug, Deserialize)]
struct SeedIngredient {
    name: String,
    amount: Quantity,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    ingredients: Vec<SeedIngredient>,
    #[serde(default)]
    recipes: Vec<NewRecipe>,
}

impl SeedFile {
    fn builtin() -> Self {
        SeedFile {
            ingredients: INGREDIENTS
                .iter()
                .map(|(name, units)| SeedIngredient {
                    name: name.to_string(),
                    amount: Quantity::from_units(*units),
                })
                .collect(),
            recipes: RECIPES
                .iter()
                .map(|(name, cents, reqs)| NewRecipe {
                    name: name.to_string(),
                    price: Money::from_cents(*cents),
                    recipe_ingredients: reqs
                        .iter()
                        .map(|(n, units)| RecipeIngredient::new(*n, Quantity::from_units(*units)))
                        .collect(),
                })
                .collect(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./brew_dev.db");
    let mut from: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--from" | "-f" => {
                if i + 1 < args.len() {
                    from = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Brew Counter Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: ./brew_dev.db)");
                println!("  -f, --from <FILE>   Load ingredients and recipes from JSON");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let seed = match &from {
        Some(path) => serde_json::from_str::<SeedFile>(&std::fs::read_to_string(path)?)?,
        None => SeedFile::builtin(),
    };

    println!("🌱 Brew Counter Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!("Source:   {}", from.as_deref().unwrap_or("built-in demo menu"));
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.ingredients().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} ingredients", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let ingredients = db.ingredients();
    let mut added = 0;
    for item in &seed.ingredients {
        if let Err(e) = validate_ingredient_name(&item.name).and(validate_ingredient_amount(item.amount)) {
            eprintln!("Skipping ingredient {}: {}", item.name, e);
            continue;
        }
        match ingredients.create(item.name.trim(), item.amount).await {
            Ok(_) => added += 1,
            Err(e) => eprintln!("Failed to insert {}: {}", item.name, e),
        }
    }
    println!("✓ Added {} ingredients", added);

    let stock = ingredients.list().await?;
    let recipes = db.recipes();
    let mut added = 0;
    for recipe in &seed.recipes {
        if let Err(e) = validate_new_recipe(recipe, Some(&stock)) {
            eprintln!("Skipping recipe {}: {}", recipe.name, e);
            continue;
        }
        match recipes.create(recipe).await {
            Ok(_) => added += 1,
            Err(e) => eprintln!("Failed to insert {}: {}", recipe.name, e),
        }
    }
    println!("✓ Added {} recipes", added);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
