//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! User input is ALWAYS passed via `.bind()` parameters, never interpolated.

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::sql_types::{Bool, Double, Nullable};

/// Case-insensitive equality on `users.email`.
///
/// # Safety
/// The email value is passed via `.bind()`, not interpolated.
#[macro_export]
macro_rules! email_matches {
    ($email:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(users.email) = LOWER(")
            .bind::<diesel::sql_types::Text, _>($email)
            .sql(")")
    };
}

/// True when the cocktail in the current row contains any of the given
/// ingredient names (compared lower-cased).
///
/// # Safety
/// The names are bound as a single text array.
#[macro_export]
macro_rules! cocktail_has_any_ingredient {
    ($lowercase_names:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>(
            "EXISTS (SELECT 1 FROM cocktail_ingredients ci \
             JOIN ingredients i ON i.id = ci.ingredient_id \
             WHERE ci.cocktail_id = cocktails.id AND LOWER(i.name) = ANY(",
        )
        .bind::<diesel::sql_types::Array<diesel::sql_types::Text>, _>($lowercase_names)
        .sql("))")
    };
}

/// `ORDER BY` term for ingredient percentage with nulls last.
///
/// # Safety
/// Static SQL string with no user input.
pub fn percentage_order(descending: bool) -> SqlLiteral<Nullable<Double>> {
    if descending {
        sql::<Nullable<Double>>("ingredients.percentage DESC NULLS LAST")
    } else {
        sql::<Nullable<Double>>("ingredients.percentage ASC NULLS LAST")
    }
}

/// True when the cocktail in the current row has at least one alcoholic
/// ingredient.
///
/// # Safety
/// Static SQL string with no user input.
pub fn cocktail_has_alcohol() -> SqlLiteral<Bool> {
    sql::<Bool>(
        "EXISTS (SELECT 1 FROM cocktail_ingredients ci \
         JOIN ingredients i ON i.id = ci.ingredient_id \
         WHERE ci.cocktail_id = cocktails.id AND i.alcoholic)",
    )
}
