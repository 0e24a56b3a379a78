use crate::auth::Role;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub about_me: String,
    pub role: String,
    pub is_enabled: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Unknown role strings are treated as the least privileged role.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::User)
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub about_me: &'a str,
    pub role: &'a str,
    pub is_verified: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::email_tokens)]
pub struct NewEmailToken<'a> {
    pub user_id: Uuid,
    pub purpose: &'a str,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::email_actions)]
pub struct NewEmailAction<'a> {
    pub user_id: Uuid,
    pub action: &'a str,
    pub last_sent_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = crate::schema::ingredient_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct IngredientType {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = crate::schema::cocktail_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct CocktailCategory {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = crate::schema::ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub alcoholic: bool,
    pub type_name: Option<String>,
    pub percentage: Option<f64>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub alcoholic: bool,
    pub type_name: Option<&'a str>,
    pub percentage: Option<f64>,
    pub image_url: &'a str,
}

#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct IngredientChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub alcoholic: Option<bool>,
    pub type_name: Option<String>,
    pub percentage: Option<f64>,
    pub image_url: Option<String>,
}

impl IngredientChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.alcoholic.is_none()
            && self.type_name.is_none()
            && self.percentage.is_none()
            && self.image_url.is_none()
    }
}

#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = crate::schema::cocktails)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Cocktail {
    pub id: i32,
    pub name: String,
    pub instructions: String,
    pub glass: String,
    pub category_name: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cocktails)]
pub struct NewCocktail<'a> {
    pub name: &'a str,
    pub instructions: &'a str,
    pub glass: &'a str,
    pub category_name: Option<&'a str>,
    pub image_url: &'a str,
}

#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = crate::schema::cocktails)]
pub struct CocktailChanges {
    pub name: Option<String>,
    pub instructions: Option<String>,
    pub glass: Option<String>,
    pub category_name: Option<String>,
    pub image_url: Option<String>,
}

impl CocktailChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.instructions.is_none()
            && self.glass.is_none()
            && self.category_name.is_none()
            && self.image_url.is_none()
    }
}

/// Link between a cocktail and one of its ingredients.
#[derive(Queryable, Selectable, Serialize, ToSchema, Debug, Clone)]
#[diesel(table_name = crate::schema::cocktail_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct CocktailIngredient {
    pub cocktail_id: i32,
    pub ingredient_id: i32,
    pub amount: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cocktail_ingredients)]
pub struct NewCocktailIngredient<'a> {
    pub cocktail_id: i32,
    pub ingredient_id: i32,
    pub amount: &'a str,
    pub note: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Rating {
    pub user_id: Uuid,
    pub cocktail_id: i32,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ratings)]
pub struct NewRating {
    pub user_id: Uuid,
    pub cocktail_id: i32,
    pub rating: f64,
}
