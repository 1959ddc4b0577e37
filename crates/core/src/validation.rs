//! Request payload validation.
//!
//! Handlers take the body as raw JSON and run it through a `validate_*`
//! function that either produces the validated payload or the full list of
//! human-readable error messages. Working on `serde_json::Value` keeps every
//! shape problem inside the contract: a missing field, a wrongly-typed field
//! (`"rating": "4"`, `"name": 123`), and a fractional rating all come back
//! as 400 `{errors: [..]}`, never as an extractor rejection. Handlers run
//! validation before touching the store, so a 400 response never leaves a
//! partial mutation behind.

use serde_json::Value;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Place
// ---------------------------------------------------------------------------

/// A place payload that passed validation.
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub name: String,
    pub location: String,
    pub rating: i32,
    pub description: String,
    pub video_url: Option<String>,
    pub category_id: Option<DbId>,
}

/// Validate a place payload, collecting every violation.
pub fn validate_place(body: &Value) -> Result<NewPlace, Vec<String>> {
    let mut errors = Vec::new();

    match non_empty(body.get("name")) {
        None => errors.push("Name is required and must be a non-empty string".to_string()),
        Some(name) if !name.chars().any(|c| c.is_ascii_alphabetic()) => {
            errors.push("Name must contain at least one letter".to_string());
        }
        Some(_) => {}
    }

    let location = non_empty(body.get("location"));
    if location.is_none() {
        errors.push("Location is required and must be a non-empty string".to_string());
    }

    let rating = integer_rating(body.get("rating"));
    if rating.is_none() {
        errors.push("Rating is required and must be an integer between 1 and 5".to_string());
    }

    let description = non_empty(body.get("description"));
    if description.is_none() {
        errors.push("Description is required and must be a non-empty string".to_string());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewPlace {
        name: string_field(body.get("name")).unwrap_or_default(),
        location: string_field(body.get("location")).unwrap_or_default(),
        rating: rating.unwrap_or_default(),
        description: string_field(body.get("description")).unwrap_or_default(),
        video_url: string_field(body.get("videoUrl")),
        category_id: body.get("categoryId").and_then(Value::as_i64),
    })
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A category payload that passed validation.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub icon: Option<String>,
}

/// Validate a category payload.
pub fn validate_category(body: &Value) -> Result<NewCategory, Vec<String>> {
    let mut errors = Vec::new();

    if non_empty(body.get("name")).is_none() {
        errors.push("Name is required and must be a non-empty string".to_string());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewCategory {
        name: string_field(body.get("name")).unwrap_or_default(),
        icon: string_field(body.get("icon")),
    })
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// A review payload that passed validation.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub content: String,
    pub rating: i32,
    pub author: String,
    pub place_id: DbId,
}

/// Validate a review payload.
pub fn validate_review(body: &Value) -> Result<NewReview, Vec<String>> {
    let mut errors = Vec::new();

    if non_empty(body.get("content")).is_none() {
        errors.push("Content is required and must be a non-empty string".to_string());
    }

    let rating = integer_rating(body.get("rating"));
    if rating.is_none() {
        errors.push("Rating is required and must be an integer between 1 and 5".to_string());
    }

    if non_empty(body.get("author")).is_none() {
        errors.push("Author is required and must be a non-empty string".to_string());
    }

    let place_id = body.get("placeId").and_then(Value::as_i64);
    if place_id.is_none() {
        errors.push("PlaceId is required and must be a number".to_string());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewReview {
        content: string_field(body.get("content")).unwrap_or_default(),
        rating: rating.unwrap_or_default(),
        author: string_field(body.get("author")).unwrap_or_default(),
        place_id: place_id.unwrap_or_default(),
    })
}

/// A review update that passed validation. `placeId` is intentionally
/// absent: updates keep the review attached to its original place.
#[derive(Debug, Clone)]
pub struct ReviewUpdate {
    pub content: String,
    pub rating: i32,
    pub author: String,
}

/// Validate a review update payload (PUT). Ignores any `placeId` present.
pub fn validate_review_update(body: &Value) -> Result<ReviewUpdate, Vec<String>> {
    let mut errors = Vec::new();

    if non_empty(body.get("content")).is_none() {
        errors.push("Content is required and must be a non-empty string".to_string());
    }

    let rating = integer_rating(body.get("rating"));
    if rating.is_none() {
        errors.push("Rating is required and must be an integer between 1 and 5".to_string());
    }

    if non_empty(body.get("author")).is_none() {
        errors.push("Author is required and must be a non-empty string".to_string());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ReviewUpdate {
        content: string_field(body.get("content")).unwrap_or_default(),
        rating: rating.unwrap_or_default(),
        author: string_field(body.get("author")).unwrap_or_default(),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns the string if the value is a string, non-empty after trimming.
/// Missing fields and non-string values both come back as `None`.
fn non_empty(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Returns the untrimmed string content of a field, if it is a string.
fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// Returns the rating if it is a JSON integer in [1, 5]. Strings and
/// fractional numbers are rejected.
fn integer_rating(value: Option<&Value>) -> Option<i32> {
    let n = value?.as_i64()?;
    if (1..=5).contains(&n) {
        Some(n as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_place() -> Value {
        json!({
            "name": "Test Place",
            "location": "Test Location",
            "rating": 4,
            "description": "Test Description"
        })
    }

    #[test]
    fn valid_place_passes() {
        let place = validate_place(&full_place()).expect("should validate");
        assert_eq!(place.name, "Test Place");
        assert_eq!(place.rating, 4);
    }

    #[test]
    fn missing_fields_collect_every_error() {
        let errors = validate_place(&json!({ "name": "Invalid Place" })).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("Location")));
        assert!(errors.iter().any(|e| e.contains("Rating")));
        assert!(errors.iter().any(|e| e.contains("Description")));
    }

    #[test]
    fn wrongly_typed_fields_collect_the_same_errors() {
        let mut input = full_place();
        input["name"] = json!(123);
        input["rating"] = json!("4");
        let errors = validate_place(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e == "Name is required and must be a non-empty string"));
        assert!(errors
            .iter()
            .any(|e| e == "Rating is required and must be an integer between 1 and 5"));
    }

    #[test]
    fn non_object_bodies_fail_every_rule() {
        let errors = validate_place(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn whitespace_only_name_is_rejected() {
        let mut input = full_place();
        input["name"] = json!("   ");
        let errors = validate_place(&input).unwrap_err();
        assert!(errors[0].starts_with("Name is required"));
    }

    #[test]
    fn numeric_only_name_is_rejected() {
        let mut input = full_place();
        input["name"] = json!("12345");
        let errors = validate_place(&input).unwrap_err();
        assert_eq!(errors, vec!["Name must contain at least one letter"]);
    }

    #[test]
    fn fractional_rating_is_rejected() {
        let mut input = full_place();
        input["rating"] = json!(3.5);
        let errors = validate_place(&input).unwrap_err();
        assert_eq!(
            errors,
            vec!["Rating is required and must be an integer between 1 and 5"]
        );
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        for bad in [0, 6, -1] {
            let mut input = full_place();
            input["rating"] = json!(bad);
            assert!(validate_place(&input).is_err(), "rating {bad} should fail");
        }
    }

    #[test]
    fn category_requires_a_string_name() {
        let errors = validate_category(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 1);

        let errors = validate_category(&json!({ "name": 7 })).unwrap_err();
        assert_eq!(errors.len(), 1);

        assert!(validate_category(&json!({ "name": "Beaches" })).is_ok());
    }

    #[test]
    fn review_update_ignores_place_id() {
        let update = validate_review_update(&json!({
            "content": "Still great",
            "rating": 4,
            "author": "Ana"
        }))
        .expect("should validate without placeId");
        assert_eq!(update.rating, 4);

        let errors = validate_review_update(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn review_requires_all_fields() {
        let errors = validate_review(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 4);

        let errors = validate_review(&json!({
            "content": "Great spot",
            "rating": 5,
            "author": "Ana",
            "placeId": "1"
        }))
        .unwrap_err();
        assert_eq!(errors, vec!["PlaceId is required and must be a number"]);

        let review = validate_review(&json!({
            "content": "Great spot",
            "rating": 5,
            "author": "Ana",
            "placeId": 1
        }))
        .expect("should validate");
        assert_eq!(review.place_id, 1);
    }
}
