//! Validation rules for tours and users
//!
//! Each entity has one validation function that checks the full candidate
//! state of a write. The repositories call it on create and on update alike,
//! so cross-field rules such as `priceDiscount < price` hold on every path.
//! Uniqueness needs the store and is checked by the repositories.

use std::borrow::Cow;

use validator::{ValidateEmail, ValidationError, ValidationErrors};

use crate::model::{Difficulty, TourDraft, UserDraft};

pub const TOUR_NAME_MIN_CHARS: usize = 10;
pub const TOUR_NAME_MAX_CHARS: usize = 40;
pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 5.0;
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Human-readable messages reported with each violation
pub mod messages {
    pub const TOUR_NAME_REQUIRED: &str = "A tour must have a name.";
    pub const TOUR_NAME_TOO_LONG: &str = "A tour name must have <= 40 characters.";
    pub const TOUR_NAME_TOO_SHORT: &str = "A tour name must have >= 10 characters.";
    pub const TOUR_NAME_TAKEN: &str = "A tour with this name already exists.";
    pub const DIFFICULTY: &str = "Difficulty must be either easy, medium or difficult";
    pub const RATING_TOO_LOW: &str = "Rating must be above 1.0";
    pub const RATING_TOO_HIGH: &str = "Rating must not exceed 5.0";
    pub const USER_NAME_REQUIRED: &str = "You must provide your name to register an account.";
    pub const EMAIL_REQUIRED: &str = "Please provide your email";
    pub const EMAIL_INVALID: &str = "Please provide a valid email";
    pub const EMAIL_TAKEN: &str = "You cannot use this email address. It may already exist.";
    pub const PASSWORD_REQUIRED: &str = "Please provide a password";
    pub const PASSWORD_TOO_SHORT: &str = "A password must have at least 8 characters.";
    pub const PASSWORD_CONFIRM_REQUIRED: &str = "Please confirm your password";
    pub const PASSWORDS_MUST_MATCH: &str = "Passwords must match.";
}

/// Whether a write creates a record or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Builds a single field violation with a code and message
pub fn violation(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Wraps one violation on `field` into a full error set
pub fn field_error(
    field: &'static str,
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, violation(code, message));
    errors
}

/// Checks every tour rule against the full candidate state
pub fn validate_tour(draft: &TourDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name_chars = draft.name.chars().count();
    if name_chars == 0 {
        errors.add("name", violation("required", messages::TOUR_NAME_REQUIRED));
    } else if name_chars > TOUR_NAME_MAX_CHARS {
        errors.add("name", violation("maxlength", messages::TOUR_NAME_TOO_LONG));
    } else if name_chars < TOUR_NAME_MIN_CHARS {
        errors.add("name", violation("minlength", messages::TOUR_NAME_TOO_SHORT));
    }

    if let Some(difficulty) = draft.difficulty.as_deref() {
        if difficulty.parse::<Difficulty>().is_err() {
            errors.add("difficulty", violation("enum", messages::DIFFICULTY));
        }
    }

    if draft.ratings_average.is_nan() || draft.ratings_average < RATING_MIN {
        errors.add("ratingsAverage", violation("min", messages::RATING_TOO_LOW));
    } else if draft.ratings_average > RATING_MAX {
        errors.add("ratingsAverage", violation("max", messages::RATING_TOO_HIGH));
    }

    if let Some(discount) = draft.price_discount {
        let below_price = draft.price.is_some_and(|price| discount < price);
        if !below_price {
            errors.add(
                "priceDiscount",
                violation(
                    "discount",
                    format!("Discount price ({discount}) should be lower than regular price."),
                ),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks every user rule against the full candidate state
///
/// On create a password and its confirmation are required. On update they
/// are only checked when the write sets a new password.
pub fn validate_user(draft: &UserDraft, mode: WriteMode) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.name.is_empty() {
        errors.add("name", violation("required", messages::USER_NAME_REQUIRED));
    }

    if draft.email.is_empty() {
        errors.add("email", violation("required", messages::EMAIL_REQUIRED));
    } else if !draft.email.validate_email() {
        errors.add("email", violation("email", messages::EMAIL_INVALID));
    }

    match (draft.password.as_deref(), mode) {
        (None, WriteMode::Create) => {
            errors.add("password", violation("required", messages::PASSWORD_REQUIRED));
        }
        (None, WriteMode::Update) => {}
        (Some(password), _) => {
            if password.chars().count() < PASSWORD_MIN_CHARS {
                errors.add("password", violation("minlength", messages::PASSWORD_TOO_SHORT));
            }
            match draft.password_confirm.as_deref() {
                None => errors.add(
                    "passwordConfirm",
                    violation("required", messages::PASSWORD_CONFIRM_REQUIRED),
                ),
                Some(confirm) if confirm != password => errors.add(
                    "passwordConfirm",
                    violation("match", messages::PASSWORDS_MUST_MATCH),
                ),
                Some(_) => {}
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
