//! Demo catalog loaded by `server --seed`. Safe to run repeatedly: rows that
//! already exist are left alone.

use crate::auth::{hash_password, Role};
use crate::email_matches;
use crate::models::{NewCocktail, NewCocktailIngredient, NewIngredient, NewRating, NewUser};
use crate::schema::{
    cocktail_categories, cocktail_ingredients, cocktails, ingredient_types, ingredients, ratings,
    users,
};
use diesel::prelude::*;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Failed to hash seed password: {0}")]
    Hash(String),
}

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "cocktails123";

const CATEGORIES: &[&str] = &["Classic", "Tropical"];
const INGREDIENT_TYPES: &[&str] = &["Spirit", "Mixer", "Juice", "Garnish"];

struct SeedIngredient {
    name: &'static str,
    alcoholic: bool,
    type_name: &'static str,
    percentage: Option<f64>,
    image: &'static str,
}

const INGREDIENTS: &[SeedIngredient] = &[
    SeedIngredient {
        name: "Vodka",
        alcoholic: true,
        type_name: "Spirit",
        percentage: Some(40.0),
        image: "/media/ingredients/vodka.png",
    },
    SeedIngredient {
        name: "White Rum",
        alcoholic: true,
        type_name: "Spirit",
        percentage: Some(37.5),
        image: "/media/ingredients/white_rum.png",
    },
    SeedIngredient {
        name: "Lime Juice",
        alcoholic: false,
        type_name: "Juice",
        percentage: None,
        image: "/media/ingredients/lime_juice.png",
    },
    SeedIngredient {
        name: "Sugar Syrup",
        alcoholic: false,
        type_name: "Mixer",
        percentage: None,
        image: "/media/ingredients/sugar_syrup.png",
    },
    SeedIngredient {
        name: "Mint Leaves",
        alcoholic: false,
        type_name: "Garnish",
        percentage: None,
        image: "/media/ingredients/mint_leaves.png",
    },
    SeedIngredient {
        name: "Soda Water",
        alcoholic: false,
        type_name: "Mixer",
        percentage: None,
        image: "/media/ingredients/soda_water.png",
    },
];

struct SeedCocktail {
    name: &'static str,
    instructions: &'static str,
    glass: &'static str,
    category: &'static str,
    image: &'static str,
    ingredients: &'static [(&'static str, &'static str, Option<&'static str>)], // (ingredient, amount, note)
}

const COCKTAILS: &[SeedCocktail] = &[
    SeedCocktail {
        name: "Mojito",
        instructions: "Muddle mint leaves with sugar syrup and lime juice. Add rum and ice, \
                       top with soda water, stir gently and garnish with mint.",
        glass: "Highball",
        category: "Tropical",
        image: "/media/cocktails/mojito.png",
        ingredients: &[
            ("White Rum", "50 ml", None),
            ("Lime Juice", "25 ml", Some("fresh")),
            ("Sugar Syrup", "15 ml", None),
            ("Mint Leaves", "6 leaves", Some("muddled")),
            ("Soda Water", "60 ml", Some("top up")),
        ],
    },
    SeedCocktail {
        name: "Vodka Tonic",
        instructions: "Fill a glass with ice. Add vodka, top with tonic water, \
                       stir gently and garnish with lime.",
        glass: "Highball",
        category: "Classic",
        image: "/media/cocktails/vodka_tonic.png",
        ingredients: &[
            ("Vodka", "50 ml", None),
            ("Soda Water", "100 ml", Some("or tonic water")),
            ("Lime Juice", "10 ml", Some("optional")),
        ],
    },
];

struct SeedUser {
    email: &'static str,
    name: &'static str,
    role: Role,
}

const USERS: &[SeedUser] = &[
    SeedUser {
        email: "user@example.com",
        name: "Demo User",
        role: Role::User,
    },
    SeedUser {
        email: "moderator@example.com",
        name: "Moderator",
        role: Role::Moderator,
    },
    SeedUser {
        email: "admin@example.com",
        name: "Admin",
        role: Role::Admin,
    },
];

// (user email, cocktail, rating)
const RATINGS: &[(&str, &str, f64)] = &[
    ("moderator@example.com", "Mojito", 4.9),
    ("moderator@example.com", "Vodka Tonic", 4.0),
    ("admin@example.com", "Mojito", 4.2),
    ("user@example.com", "Mojito", 5.0),
];

pub fn run(conn: &mut PgConnection) -> Result<(), SeedError> {
    let password_hash = hash_password(SEED_PASSWORD).map_err(|e| SeedError::Hash(e.to_string()))?;

    conn.transaction(|conn| {
        for name in CATEGORIES {
            diesel::insert_into(cocktail_categories::table)
                .values(cocktail_categories::name.eq(*name))
                .on_conflict_do_nothing()
                .execute(conn)?;
        }
        for name in INGREDIENT_TYPES {
            diesel::insert_into(ingredient_types::table)
                .values(ingredient_types::name.eq(*name))
                .on_conflict_do_nothing()
                .execute(conn)?;
        }

        for ingredient in INGREDIENTS {
            diesel::insert_into(ingredients::table)
                .values(&NewIngredient {
                    name: ingredient.name,
                    description: None,
                    alcoholic: ingredient.alcoholic,
                    type_name: Some(ingredient.type_name),
                    percentage: ingredient.percentage,
                    image_url: ingredient.image,
                })
                .on_conflict_do_nothing()
                .execute(conn)?;
        }

        for cocktail in COCKTAILS {
            diesel::insert_into(cocktails::table)
                .values(&NewCocktail {
                    name: cocktail.name,
                    instructions: cocktail.instructions,
                    glass: cocktail.glass,
                    category_name: Some(cocktail.category),
                    image_url: cocktail.image,
                })
                .on_conflict_do_nothing()
                .execute(conn)?;

            let cocktail_id = cocktail_id_by_name(conn, cocktail.name)?;
            for &(ingredient, amount, note) in cocktail.ingredients {
                let ingredient_id: i32 = ingredients::table
                    .filter(ingredients::name.eq(ingredient))
                    .select(ingredients::id)
                    .first(conn)?;
                diesel::insert_into(cocktail_ingredients::table)
                    .values(&NewCocktailIngredient {
                        cocktail_id,
                        ingredient_id,
                        amount,
                        note,
                    })
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
        }

        for user in USERS {
            diesel::insert_into(users::table)
                .values(&NewUser {
                    email: user.email,
                    password_hash: &password_hash,
                    name: user.name,
                    about_me: "",
                    role: user.role.as_str(),
                    is_verified: true,
                })
                .on_conflict_do_nothing()
                .execute(conn)?;
            tracing::info!(email = user.email, role = %user.role, "Seeded user");
        }

        for &(email, cocktail, rating) in RATINGS {
            let user_id: Uuid = users::table
                .filter(email_matches!(email))
                .select(users::id)
                .first(conn)?;
            let cocktail_id = cocktail_id_by_name(conn, cocktail)?;
            diesel::insert_into(ratings::table)
                .values(&NewRating {
                    user_id,
                    cocktail_id,
                    rating,
                })
                .on_conflict_do_nothing()
                .execute(conn)?;
        }

        Ok::<_, diesel::result::Error>(())
    })?;

    tracing::info!(
        cocktails = COCKTAILS.len(),
        ingredients = INGREDIENTS.len(),
        users = USERS.len(),
        "Seeded demo catalog"
    );
    Ok(())
}

fn cocktail_id_by_name(conn: &mut PgConnection, name: &str) -> QueryResult<i32> {
    cocktails::table
        .filter(cocktails::name.eq(name))
        .select(cocktails::id)
        .first(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ratings::clamp_rating;

    #[test]
    fn test_references_resolve() {
        for ingredient in INGREDIENTS {
            assert!(
                INGREDIENT_TYPES.contains(&ingredient.type_name),
                "{} has unknown type",
                ingredient.name
            );
        }
        for cocktail in COCKTAILS {
            assert!(CATEGORIES.contains(&cocktail.category));
            for (name, _, _) in cocktail.ingredients {
                assert!(
                    INGREDIENTS.iter().any(|i| i.name == *name),
                    "{} uses unknown ingredient {}",
                    cocktail.name,
                    name
                );
            }
        }
        for (email, cocktail, _) in RATINGS {
            assert!(USERS.iter().any(|u| u.email == *email));
            assert!(COCKTAILS.iter().any(|c| c.name == *cocktail));
        }
    }

    #[test]
    fn test_ratings_already_in_range() {
        for (_, _, rating) in RATINGS {
            assert_eq!(clamp_rating(*rating).unwrap(), *rating);
        }
    }

    #[test]
    fn test_one_account_per_role() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            assert_eq!(USERS.iter().filter(|u| u.role == role).count(), 1);
        }
    }
}
