use rust_decimal::Decimal;

use super::{
    dto::RecipePayload,
    repo::{NewRecipe, RecipeChanges},
};
use crate::error::{AppError, Violations, REQUIRED};

const TITLE_MAX_LEN: usize = 255;
const LINK_MAX_LEN: usize = 255;
const PRICE_SCALE: u32 = 2;
// NUMERIC(5, 2)
const PRICE_LIMIT: i64 = 1000;

const NON_NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";

fn check_time_minutes(v: &mut Violations, minutes: i64) -> Option<i32> {
    if minutes < 0 {
        v.add("time_minutes", NON_NEGATIVE);
        return None;
    }
    match i32::try_from(minutes) {
        Ok(m) => Some(m),
        Err(_) => {
            v.add("time_minutes", "Ensure this value is less than or equal to 2147483647.");
            None
        }
    }
}

fn check_price(v: &mut Violations, price: Decimal) -> Option<Decimal> {
    if price.is_sign_negative() && !price.is_zero() {
        v.add("price", NON_NEGATIVE);
        return None;
    }
    if price.normalize().scale() > PRICE_SCALE {
        v.add("price", "Ensure that there are no more than 2 decimal places.");
        return None;
    }
    if price >= Decimal::from(PRICE_LIMIT) {
        v.add("price", "Ensure that there are no more than 5 digits in total.");
        return None;
    }
    let mut price = price.abs();
    price.rescale(PRICE_SCALE);
    Some(price)
}

/// Validates a payload into column changes. Unless `partial`, the required
/// fields (title, time_minutes, price) must all be present.
pub fn validate(payload: RecipePayload, partial: bool) -> Result<RecipeChanges, AppError> {
    let mut v = Violations::default();
    if !partial {
        v.require("title", &payload.title);
        v.require("time_minutes", &payload.time_minutes);
        v.require("price", &payload.price);
    }

    if let Some(title) = &payload.title {
        v.check_text("title", title, TITLE_MAX_LEN, false);
    }
    if let Some(link) = &payload.link {
        v.check_text("link", link, LINK_MAX_LEN, true);
    }
    let time_minutes = payload
        .time_minutes
        .and_then(|m| check_time_minutes(&mut v, m));
    let price = payload.price.and_then(|p| check_price(&mut v, p));
    v.finish()?;

    Ok(RecipeChanges {
        title: payload.title,
        time_minutes,
        price,
        link: payload.link,
        description: payload.description,
    })
}

/// Builds a new recipe; link and description default to empty.
pub fn new_recipe(payload: RecipePayload) -> Result<NewRecipe, AppError> {
    let changes = validate(payload, false)?;
    let (Some(title), Some(time_minutes), Some(price)) =
        (changes.title, changes.time_minutes, changes.price)
    else {
        return Err(AppError::field("non_field_errors", REQUIRED));
    };
    Ok(NewRecipe {
        title,
        time_minutes,
        price,
        link: changes.link.unwrap_or_default(),
        description: changes.description.unwrap_or_default(),
    })
}
