//! `brew quote` and `brew purchase`.
//!
//! Both resolve `--item` keys to recipe ids first: a key that is not an id
//! but matches a recipe name (ignoring ASCII case) is accepted, so
//! `--item latte=2` works without looking the id up.

use brew_core::{parse_tender, Recipe, SelectionLine};
use brew_db::{Checkout, IngredientStore, RecipeCatalog};
use serde_json::json;

use crate::output::{Formatter, Output};

/// Rewrites recipe names to ids. Unmatched keys are left for the quote to reject.
pub fn resolve_names(recipes: &[Recipe], items: Vec<SelectionLine>) -> Vec<SelectionLine> {
    items
        .into_iter()
        .map(|mut line| {
            if !recipes.iter().any(|r| r.id == line.recipe_id) {
                if let Some(recipe) = recipes
                    .iter()
                    .find(|r| r.name.eq_ignore_ascii_case(line.recipe_id.trim()))
                {
                    line.recipe_id = recipe.id.clone();
                }
            }
            line
        })
        .collect()
}

async fn selections<S, C>(checkout: &Checkout<S, C>, items: Vec<SelectionLine>) -> anyhow::Result<Vec<SelectionLine>>
where
    S: IngredientStore,
    C: RecipeCatalog,
{
    let recipes = checkout.catalog().list().await?;
    Ok(resolve_names(&recipes, items))
}

pub async fn quote<S, C>(
    checkout: &Checkout<S, C>,
    fmt: &Formatter,
    items: Vec<SelectionLine>,
) -> anyhow::Result<Output>
where
    S: IngredientStore,
    C: RecipeCatalog,
{
    let selections = selections(checkout, items).await?;
    let quote = checkout.quote(&selections).await?;
    Output::new(&quote, fmt.quote(&quote))
}

pub async fn purchase<S, C>(
    checkout: &Checkout<S, C>,
    fmt: &Formatter,
    items: Vec<SelectionLine>,
    pay: Option<String>,
) -> anyhow::Result<Output>
where
    S: IngredientStore,
    C: RecipeCatalog,
{
    let selections = selections(checkout, items).await?;
    let quote = checkout.quote(&selections).await?;

    let payment = match pay.as_deref() {
        Some(raw) => parse_tender(raw)?,
        None => None,
    };
    let settlement = checkout.pay(&quote, payment).await?;

    Output::new(
        &json!({ "quote": quote, "settlement": settlement }),
        fmt.receipt(&quote, &settlement),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use brew_core::{Money, NewRecipe, PurchaseError, Quantity, RecipeIngredient};
    use brew_db::{CheckoutError, MemoryStore};

    fn units(n: i64) -> Quantity {
        Quantity::from_units(n)
    }

    /// Milk 120, Coffee 100; Latte $3.50 (Milk 100), Cappuccino $2.00 (Milk 10).
    async fn shop() -> (Checkout<MemoryStore, MemoryStore>, Recipe, Recipe) {
        let store = MemoryStore::new();
        IngredientStore::create(&store, "Milk", units(120)).await.unwrap();
        IngredientStore::create(&store, "Coffee", units(100)).await.unwrap();

        let latte = RecipeCatalog::create(
            &store,
            &NewRecipe {
                name: "Latte".to_string(),
                price: Money::from_cents(350),
                recipe_ingredients: vec![RecipeIngredient::new("Milk", units(100))],
            },
        )
        .await
        .unwrap();
        let cappuccino = RecipeCatalog::create(
            &store,
            &NewRecipe {
                name: "Cappuccino".to_string(),
                price: Money::from_cents(200),
                recipe_ingredients: vec![RecipeIngredient::new("Milk", units(10))],
            },
        )
        .await
        .unwrap();

        (Checkout::new(store.clone(), store), latte, cappuccino)
    }

    fn rejection(err: &anyhow::Error) -> &PurchaseError {
        match err.downcast_ref::<CheckoutError>() {
            Some(CheckoutError::Purchase(e)) => e,
            other => panic!("expected a purchase rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_names_prefers_ids() {
        let latte = Recipe::new("Latte", Money::from_cents(350), vec![]);
        let items = vec![
            SelectionLine::new("LATTE", 1),
            SelectionLine::new(latte.id.clone(), 2),
            SelectionLine::new("Mocha", 1),
        ];

        let resolved = resolve_names(&[latte.clone()], items);

        assert_eq!(resolved[0].recipe_id, latte.id);
        assert_eq!(resolved[1].recipe_id, latte.id);
        assert_eq!(resolved[2].recipe_id, "Mocha");
    }

    #[tokio::test]
    async fn test_quote_by_name() {
        let (checkout, _, _) = shop().await;

        let output = quote(&checkout, &Formatter::new("$"), vec![SelectionLine::new("latte", 1)])
            .await
            .unwrap();

        assert_eq!(output.json()["totalPrice"], 350);
        assert!(output.text().contains("$3.50"));
    }

    #[tokio::test]
    async fn test_purchase_returns_change_and_stock() {
        let (checkout, latte, cappuccino) = shop().await;

        let output = purchase(
            &checkout,
            &Formatter::new("$"),
            vec![SelectionLine::new(latte.id, 1), SelectionLine::new(cappuccino.id, 2)],
            Some("10".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(output.json()["settlement"]["change"], 250);
        assert!(output.text().contains("Change"));

        let milk = IngredientStore::list(checkout.stock()).await.unwrap()[0].clone();
        assert_eq!(milk.amount, units(0));
    }

    #[tokio::test]
    async fn test_purchase_without_payment() {
        let (checkout, latte, _) = shop().await;

        let err = purchase(&checkout, &Formatter::new("$"), vec![SelectionLine::new(latte.id, 1)], None)
            .await
            .unwrap_err();

        assert_eq!(rejection(&err), &PurchaseError::MissingPayment);
    }

    #[tokio::test]
    async fn test_purchase_with_unparseable_payment() {
        let (checkout, latte, _) = shop().await;

        let err = purchase(
            &checkout,
            &Formatter::new("$"),
            vec![SelectionLine::new(latte.id, 1)],
            Some("ten".to_string()),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PurchaseError>(),
            Some(PurchaseError::InvalidPayment { .. })
        ));
        assert_eq!(IngredientStore::list(checkout.stock()).await.unwrap()[0].amount, units(120));
    }

    #[tokio::test]
    async fn test_over_stock_selection_is_rejected_before_payment() {
        let (checkout, latte, cappuccino) = shop().await;

        let err = purchase(
            &checkout,
            &Formatter::new("$"),
            vec![SelectionLine::new(latte.id, 1), SelectionLine::new(cappuccino.id, 3)],
            Some("100".to_string()),
        )
        .await
        .unwrap_err();

        assert_eq!(rejection(&err).code(), "INSUFFICIENT_STOCK");
        assert_eq!(IngredientStore::list(checkout.stock()).await.unwrap()[0].amount, units(120));
    }
}
