use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::repo::Recipe;

/// Client-writable recipe fields. Anything else in the body, an owner id
/// included, is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RecipePayload {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
}

/// The list shape plus the description.
#[derive(Debug, Serialize)]
pub struct RecipeDetailResponse {
    #[serde(flatten)]
    pub recipe: RecipeResponse,
    pub description: String,
}

impl From<Recipe> for RecipeResponse {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            time_minutes: r.time_minutes,
            price: r.price,
            link: r.link,
        }
    }
}

impl From<Recipe> for RecipeDetailResponse {
    fn from(mut r: Recipe) -> Self {
        let description = std::mem::take(&mut r.description);
        Self {
            recipe: r.into(),
            description,
        }
    }
}
