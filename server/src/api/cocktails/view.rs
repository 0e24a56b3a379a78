//! Response shapes that embed a cocktail's ingredients.

use crate::models::{Cocktail, CocktailCategory};
use crate::schema::{cocktail_ingredients, ingredients};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// Ingredient fields shown inside cocktail responses.
#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct IngredientSummary {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub type_name: Option<String>,
    pub alcoholic: bool,
    pub percentage: Option<f64>,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct CocktailIngredientEntry {
    pub amount: String,
    pub note: Option<String>,
    pub ingredient: IngredientSummary,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct CocktailWithIngredients {
    #[serde(flatten)]
    pub cocktail: Cocktail,
    pub ingredients: Vec<CocktailIngredientEntry>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct CocktailDetail {
    #[serde(flatten)]
    pub cocktail: Cocktail,
    pub category: Option<CocktailCategory>,
    pub ingredients: Vec<CocktailIngredientEntry>,
}

/// Ingredients of each listed cocktail, in the order they were added.
pub fn load_entries(
    conn: &mut PgConnection,
    cocktail_ids: &[i32],
) -> QueryResult<HashMap<i32, Vec<CocktailIngredientEntry>>> {
    let rows: Vec<(i32, String, Option<String>, IngredientSummary)> = cocktail_ingredients::table
        .inner_join(ingredients::table)
        .filter(cocktail_ingredients::cocktail_id.eq_any(cocktail_ids))
        .order((
            cocktail_ingredients::created_at.asc(),
            cocktail_ingredients::ingredient_id.asc(),
        ))
        .select((
            cocktail_ingredients::cocktail_id,
            cocktail_ingredients::amount,
            cocktail_ingredients::note,
            IngredientSummary::as_select(),
        ))
        .load(conn)?;

    Ok(group_entries(rows))
}

fn group_entries(
    rows: Vec<(i32, String, Option<String>, IngredientSummary)>,
) -> HashMap<i32, Vec<CocktailIngredientEntry>> {
    let mut grouped: HashMap<i32, Vec<CocktailIngredientEntry>> = HashMap::new();
    for (cocktail_id, amount, note, ingredient) in rows {
        grouped
            .entry(cocktail_id)
            .or_default()
            .push(CocktailIngredientEntry {
                amount,
                note,
                ingredient,
            });
    }
    grouped
}

/// Attach ingredient entries to each cocktail, keeping the cocktail order.
pub fn with_ingredients(
    cocktails: Vec<Cocktail>,
    mut entries: HashMap<i32, Vec<CocktailIngredientEntry>>,
) -> Vec<CocktailWithIngredients> {
    cocktails
        .into_iter()
        .map(|cocktail| CocktailWithIngredients {
            ingredients: entries.remove(&cocktail.id).unwrap_or_default(),
            cocktail,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cocktail(id: i32, name: &str) -> Cocktail {
        Cocktail {
            id,
            name: name.to_string(),
            instructions: "Stir".to_string(),
            glass: "Highball".to_string(),
            category_name: None,
            image_url: format!("/media/cocktails/{}.png", id),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn summary(id: i32, name: &str, alcoholic: bool) -> IngredientSummary {
        IngredientSummary {
            id,
            name: name.to_string(),
            image_url: format!("/media/ingredients/{}.png", id),
            type_name: None,
            alcoholic,
            percentage: None,
        }
    }

    #[test]
    fn test_entries_grouped_per_cocktail_in_row_order() {
        let rows = vec![
            (1, "50ml".to_string(), None, summary(10, "White Rum", true)),
            (2, "40ml".to_string(), None, summary(11, "Vodka", true)),
            (1, "25ml".to_string(), Some("fresh".to_string()), summary(12, "Lime Juice", false)),
        ];

        let listed = with_ingredients(
            vec![cocktail(1, "Mojito"), cocktail(2, "Vodka Tonic"), cocktail(3, "Empty")],
            group_entries(rows),
        );

        assert_eq!(listed.len(), 3);
        let names: Vec<&str> = listed[0]
            .ingredients
            .iter()
            .map(|e| e.ingredient.name.as_str())
            .collect();
        assert_eq!(names, vec!["White Rum", "Lime Juice"]);
        assert_eq!(listed[1].ingredients.len(), 1);
        assert!(listed[2].ingredients.is_empty());
    }

    #[test]
    fn test_flattened_json_shape() {
        let listed = with_ingredients(
            vec![cocktail(1, "Mojito")],
            group_entries(vec![(
                1,
                "50ml".to_string(),
                None,
                summary(10, "White Rum", true),
            )]),
        );

        let json = serde_json::to_value(&listed[0]).unwrap();
        assert_eq!(json["name"], "Mojito");
        assert_eq!(json["imageUrl"], "/media/cocktails/1.png");
        assert_eq!(json["ingredients"][0]["amount"], "50ml");
        assert_eq!(json["ingredients"][0]["ingredient"]["typeName"], serde_json::Value::Null);
        assert_eq!(json["ingredients"][0]["ingredient"]["alcoholic"], true);
    }
}
