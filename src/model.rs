//! Data models for the tours application
//!
//! This module defines the stored records (`Tour`, `User`), the write payloads
//! accepted on create and update, the candidate drafts that validation runs
//! against, and the read projections returned to callers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::slug::slugify;

/// Default rating given to a tour that has not been rated yet
pub const DEFAULT_RATINGS_AVERAGE: f64 = 4.5;

/// Difficulty level of a tour
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Difficult => "difficult",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known difficulty levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "difficult" => Ok(Difficulty::Difficult),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}

/// Represents a tour record stored in the database
///
/// Values are persisted as JSON in camelCase, the same shape the HTTP API
/// accepts. `durationWeeks` is not stored; see [`Tour::duration_weeks`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    /// Generated document identifier
    pub id: String,

    /// Display name, unique across all tours
    pub name: String,

    /// URL-safe identifier derived from `name` on every write
    pub slug: String,

    /// Length of the tour in days
    pub duration: Option<f64>,

    pub max_group_size: Option<u32>,

    pub difficulty: Option<Difficulty>,

    #[serde(default = "default_ratings_average")]
    pub ratings_average: f64,

    #[serde(default)]
    pub ratings_quantity: u32,

    pub price: Option<f64>,

    pub price_discount: Option<f64>,

    pub summary: Option<String>,

    pub description: Option<String>,

    pub image_cover: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,

    /// Timestamp when this tour was created
    ///
    /// Hidden from the default read projection.
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub start_dates: Vec<DateTime<Utc>>,

    /// Secret tours never show up in queries or aggregations unless the
    /// caller explicitly asks for them
    #[serde(default)]
    pub secret_tour: bool,
}

fn default_ratings_average() -> f64 {
    DEFAULT_RATINGS_AVERAGE
}

impl Tour {
    /// Derived field: the tour duration expressed in weeks
    pub fn duration_weeks(&self) -> Option<f64> {
        self.duration.map(|days| days / 7.0)
    }
}

/// Request payload for creating or updating a tour
///
/// Every field is optional so the same payload serves both as a full
/// creation request and as a partial update.
///
/// # Example
/// ```json
/// {
///   "name": "The Forest Hiker",
///   "duration": 5,
///   "difficulty": "easy",
///   "price": 397,
///   "priceDiscount": 100
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TourInput {
    pub name: Option<String>,
    pub duration: Option<f64>,
    pub max_group_size: Option<u32>,
    /// Kept as raw text so an unknown level is reported as a field error
    pub difficulty: Option<String>,
    pub ratings_average: Option<f64>,
    pub ratings_quantity: Option<u32>,
    pub price: Option<f64>,
    /// `null` clears a stored discount; an absent key keeps it
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_discount: Option<Option<f64>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
    pub start_dates: Option<Vec<DateTime<Utc>>>,
    pub secret_tour: Option<bool>,
}

/// Maps a present key to `Some`, so `null` becomes `Some(None)`
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The full candidate state of a tour about to be written
///
/// Built either from a creation payload (with defaults applied) or from an
/// existing record with an update payload merged over it. Text fields are
/// trimmed while the draft is assembled, before validation sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct TourDraft {
    pub name: String,
    pub duration: Option<f64>,
    pub max_group_size: Option<u32>,
    pub difficulty: Option<String>,
    pub ratings_average: f64,
    pub ratings_quantity: u32,
    pub price: Option<f64>,
    pub price_discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub start_dates: Vec<DateTime<Utc>>,
    pub secret_tour: bool,
}

impl TourDraft {
    /// Candidate for a brand-new tour, created at `now`
    pub fn new(input: TourInput, now: DateTime<Utc>) -> Self {
        Self {
            name: input.name.as_deref().map(str::trim).unwrap_or_default().to_string(),
            duration: input.duration,
            max_group_size: input.max_group_size,
            difficulty: input.difficulty,
            ratings_average: input.ratings_average.unwrap_or(DEFAULT_RATINGS_AVERAGE),
            ratings_quantity: input.ratings_quantity.unwrap_or(0),
            price: input.price,
            price_discount: input.price_discount.flatten(),
            summary: trimmed(input.summary),
            description: trimmed(input.description),
            image_cover: input.image_cover,
            images: input.images.unwrap_or_default(),
            created_at: now,
            start_dates: input.start_dates.unwrap_or_default(),
            secret_tour: input.secret_tour.unwrap_or(false),
        }
    }

    /// Candidate for an update: the stored record with `input` merged over it
    pub fn merge(existing: &Tour, input: TourInput) -> Self {
        Self {
            name: input
                .name
                .as_deref()
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| existing.name.clone()),
            duration: input.duration.or(existing.duration),
            max_group_size: input.max_group_size.or(existing.max_group_size),
            difficulty: input
                .difficulty
                .or_else(|| existing.difficulty.map(|d| d.as_str().to_string())),
            ratings_average: input.ratings_average.unwrap_or(existing.ratings_average),
            ratings_quantity: input.ratings_quantity.unwrap_or(existing.ratings_quantity),
            price: input.price.or(existing.price),
            price_discount: match input.price_discount {
                Some(patch) => patch,
                None => existing.price_discount,
            },
            summary: trimmed(input.summary).or_else(|| existing.summary.clone()),
            description: trimmed(input.description).or_else(|| existing.description.clone()),
            image_cover: input.image_cover.or_else(|| existing.image_cover.clone()),
            images: input.images.unwrap_or_else(|| existing.images.clone()),
            created_at: existing.created_at,
            start_dates: input.start_dates.unwrap_or_else(|| existing.start_dates.clone()),
            secret_tour: input.secret_tour.unwrap_or(existing.secret_tour),
        }
    }

    /// Turns a validated draft into a storable record, deriving the slug
    pub fn into_tour(self, id: String) -> Tour {
        Tour {
            id,
            slug: slugify(&self.name),
            difficulty: self.difficulty.as_deref().and_then(|d| d.parse().ok()),
            name: self.name,
            duration: self.duration,
            max_group_size: self.max_group_size,
            ratings_average: self.ratings_average,
            ratings_quantity: self.ratings_quantity,
            price: self.price,
            price_discount: self.price_discount,
            summary: self.summary,
            description: self.description,
            image_cover: self.image_cover,
            images: self.images,
            created_at: self.created_at,
            start_dates: self.start_dates,
            secret_tour: self.secret_tour,
        }
    }
}

/// Which optional fields a read includes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Projection {
    pub created_at: bool,
}

impl Projection {
    /// Parses a `fields=` list such as `name,createdAt`
    ///
    /// Only `createdAt` changes the projection; every other field is part of
    /// the default view already.
    pub fn from_fields(fields: Option<&str>) -> Self {
        let created_at = fields
            .map(|list| list.split(',').any(|field| field.trim() == "createdAt"))
            .unwrap_or(false);
        Self { created_at }
    }
}

/// Read view of a tour, carrying the derived `durationWeeks`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TourView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub duration: Option<f64>,
    pub duration_weeks: Option<f64>,
    pub max_group_size: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub ratings_average: f64,
    pub ratings_quantity: u32,
    pub price: Option<f64>,
    pub price_discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub images: Vec<String>,
    pub start_dates: Vec<DateTime<Utc>>,
    pub secret_tour: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TourView {
    pub fn project(tour: Tour, projection: Projection) -> Self {
        Self {
            duration_weeks: tour.duration_weeks(),
            created_at: projection.created_at.then_some(tour.created_at),
            id: tour.id,
            name: tour.name,
            slug: tour.slug,
            duration: tour.duration,
            max_group_size: tour.max_group_size,
            difficulty: tour.difficulty,
            ratings_average: tour.ratings_average,
            ratings_quantity: tour.ratings_quantity,
            price: tour.price,
            price_discount: tour.price_discount,
            summary: tour.summary,
            description: tour.description,
            image_cover: tour.image_cover,
            images: tour.images,
            start_dates: tour.start_dates,
            secret_tour: tour.secret_tour,
        }
    }
}

impl From<Tour> for TourView {
    fn from(tour: Tour) -> Self {
        Self::project(tour, Projection::default())
    }
}

/// Represents a user record stored in the database
///
/// `password` only ever holds a bcrypt hash. The confirmation field exists on
/// write payloads alone and is never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Trimmed and lowercased, unique across users
    pub email: String,
    pub photo: Option<String>,
    /// bcrypt hash of the password
    pub password: String,
    pub created_at: DateTime<Utc>,
    /// Set whenever the password is replaced by an update
    #[serde(default)]
    pub password_changed_at: Option<DateTime<Utc>>,
}

/// Request payload for creating or updating a user
///
/// # Example
/// ```json
/// {
///   "name": "Jonas",
///   "email": "jonas@example.com",
///   "password": "abcd1234",
///   "passwordConfirm": "abcd1234"
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

/// The full candidate state of a user about to be written
///
/// `password` is the plaintext being set by this write, if any. On update a
/// `None` password means the stored hash stays as it is.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl UserDraft {
    pub fn new(input: UserInput) -> Self {
        Self {
            name: input.name.as_deref().map(str::trim).unwrap_or_default().to_string(),
            email: input.email.as_deref().map(normalize_email).unwrap_or_default(),
            photo: trimmed(input.photo),
            password: input.password,
            password_confirm: input.password_confirm,
        }
    }

    pub fn merge(existing: &User, input: UserInput) -> Self {
        Self {
            name: input
                .name
                .as_deref()
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| existing.name.clone()),
            email: input
                .email
                .as_deref()
                .map(normalize_email)
                .unwrap_or_else(|| existing.email.clone()),
            photo: trimmed(input.photo).or_else(|| existing.photo.clone()),
            password: input.password,
            password_confirm: input.password_confirm,
        }
    }
}

/// Read view of a user, never carrying the password hash
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            photo: user.photo,
            created_at: user.created_at,
        }
    }
}

/// Normalizes an email address to lowercase and removes surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|text| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> TourInput {
        TourInput {
            name: Some("  The Forest Hiker  ".to_string()),
            duration: Some(14.0),
            difficulty: Some("easy".to_string()),
            price: Some(397.0),
            summary: Some("  Breathtaking hike  ".to_string()),
            ..TourInput::default()
        }
    }

    #[test]
    fn test_draft_applies_defaults_and_trims() {
        let draft = TourDraft::new(sample_input(), Utc::now());

        assert_eq!(draft.name, "The Forest Hiker");
        assert_eq!(draft.summary.as_deref(), Some("Breathtaking hike"));
        assert_eq!(draft.ratings_average, DEFAULT_RATINGS_AVERAGE);
        assert_eq!(draft.ratings_quantity, 0);
        assert!(!draft.secret_tour);
    }

    #[test]
    fn test_into_tour_derives_slug_and_difficulty() {
        let tour = TourDraft::new(sample_input(), Utc::now()).into_tour("abc".to_string());

        assert_eq!(tour.slug, "the-forest-hiker");
        assert_eq!(tour.difficulty, Some(Difficulty::Easy));
        assert_eq!(tour.duration_weeks(), Some(2.0));
    }

    #[test]
    fn test_merge_keeps_unpatched_fields() {
        let created = Utc::now();
        let existing = TourDraft::new(sample_input(), created).into_tour("abc".to_string());
        let patch = TourInput {
            price: Some(500.0),
            ..TourInput::default()
        };

        let draft = TourDraft::merge(&existing, patch);

        assert_eq!(draft.name, "The Forest Hiker");
        assert_eq!(draft.price, Some(500.0));
        assert_eq!(draft.difficulty.as_deref(), Some("easy"));
        assert_eq!(draft.created_at, created);
    }

    #[test]
    fn test_merge_clears_discount_on_explicit_null() {
        let mut input = sample_input();
        input.price_discount = Some(Some(100.0));
        let existing = TourDraft::new(input, Utc::now()).into_tour("abc".to_string());

        let absent: TourInput = serde_json::from_str(r#"{"price": 80}"#).unwrap();
        assert_eq!(absent.price_discount, None);
        assert_eq!(TourDraft::merge(&existing, absent).price_discount, Some(100.0));

        let cleared: TourInput = serde_json::from_str(r#"{"price": 80, "priceDiscount": null}"#).unwrap();
        assert_eq!(cleared.price_discount, Some(None));
        assert_eq!(TourDraft::merge(&existing, cleared).price_discount, None);
    }

    #[test]
    fn test_default_projection_hides_created_at() {
        let tour = TourDraft::new(sample_input(), Utc::now()).into_tour("abc".to_string());

        let hidden = serde_json::to_value(TourView::from(tour.clone())).unwrap();
        assert!(hidden.get("createdAt").is_none());
        assert_eq!(hidden["durationWeeks"], 2.0);

        let shown = TourView::project(tour, Projection::from_fields(Some("name,createdAt")));
        assert!(shown.created_at.is_some());
    }

    #[test]
    fn test_user_draft_normalizes_email() {
        let draft = UserDraft::new(UserInput {
            name: Some(" Jonas ".to_string()),
            email: Some("  Jonas@Example.COM ".to_string()),
            ..UserInput::default()
        });

        assert_eq!(draft.name, "Jonas");
        assert_eq!(draft.email, "jonas@example.com");
    }

    #[test]
    fn test_user_view_strips_password() {
        let user = User {
            id: "u1".to_string(),
            name: "Jonas".to_string(),
            email: "jonas@example.com".to_string(),
            photo: None,
            password: "$2b$12$hash".to_string(),
            created_at: Utc::now(),
            password_changed_at: None,
        };

        let view = serde_json::to_value(UserView::from(user)).unwrap();
        assert!(view.get("password").is_none());
        assert_eq!(view["email"], "jonas@example.com");
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert!("extreme".parse::<Difficulty>().is_err());
    }
}
