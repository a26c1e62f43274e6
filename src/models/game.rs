use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::FieldError;

/// Fixed genre set. Writes with any other value are rejected.
pub const GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "RPG",
    "Strategy",
    "Sports",
    "Racing",
    "Simulation",
    "Horror",
    "Puzzle",
    "Fighting",
    "Platformer",
    "MMORPG",
];

pub const MIN_RELEASE_YEAR: i32 = 1970;

/// Upper bound for release year: announced titles may be up to two years out.
pub fn max_release_year() -> i32 {
    Utc::now().year() + 2
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub platform: Vec<String>,
    pub release_year: i32,
    pub publisher: String,
    pub rating: f64,
    pub price: f64,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a game. Rating, price and stock status are optional
/// and fall back to their schema defaults (0, 0, true).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInput {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub platform: Vec<String>,
    pub release_year: i32,
    pub publisher: String,
    pub rating: Option<f64>,
    pub price: Option<f64>,
    pub in_stock: Option<bool>,
}

impl GameInput {
    /// All field constraints must hold before anything is persisted.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        validate_title(self.title.trim(), &mut errors);
        validate_description(self.description.trim(), &mut errors);
        validate_genre(&self.genre, &mut errors);
        validate_platform(&self.platform, &mut errors);
        validate_release_year(self.release_year, &mut errors);
        if self.publisher.trim().is_empty() {
            errors.push(FieldError::new("publisher", "Publisher is required"));
        }
        if let Some(rating) = self.rating {
            validate_rating(rating, &mut errors);
        }
        if let Some(price) = self.price {
            validate_price(price, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Partial update payload. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub platform: Option<Vec<String>>,
    pub release_year: Option<i32>,
    pub publisher: Option<String>,
    pub rating: Option<f64>,
    pub price: Option<f64>,
    pub in_stock: Option<bool>,
}

impl GameUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.genre.is_none()
            && self.platform.is_none()
            && self.release_year.is_none()
            && self.publisher.is_none()
            && self.rating.is_none()
            && self.price.is_none()
            && self.in_stock.is_none()
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.is_empty() {
            errors.push(FieldError::new("body", "At least one field must be provided"));
            return Err(errors);
        }

        if let Some(title) = &self.title {
            validate_title(title.trim(), &mut errors);
        }
        if let Some(description) = &self.description {
            validate_description(description.trim(), &mut errors);
        }
        if let Some(genre) = &self.genre {
            validate_genre(genre, &mut errors);
        }
        if let Some(platform) = &self.platform {
            validate_platform(platform, &mut errors);
        }
        if let Some(year) = self.release_year {
            validate_release_year(year, &mut errors);
        }
        if let Some(publisher) = &self.publisher {
            if publisher.trim().is_empty() {
                errors.push(FieldError::new("publisher", "Publisher cannot be empty"));
            }
        }
        if let Some(rating) = self.rating {
            validate_rating(rating, &mut errors);
        }
        if let Some(price) = self.price {
            validate_price(price, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_title(title: &str, errors: &mut Vec<FieldError>) {
    if title.chars().count() < 2 {
        errors.push(FieldError::new("title", "Title must be at least 2 characters"));
    } else if title.chars().count() > 200 {
        errors.push(FieldError::new("title", "Title cannot exceed 200 characters"));
    }
}

fn validate_description(description: &str, errors: &mut Vec<FieldError>) {
    if description.chars().count() < 10 {
        errors.push(FieldError::new(
            "description",
            "Description must be at least 10 characters",
        ));
    } else if description.chars().count() > 2000 {
        errors.push(FieldError::new(
            "description",
            "Description cannot exceed 2000 characters",
        ));
    }
}

fn validate_genre(genre: &str, errors: &mut Vec<FieldError>) {
    if !GENRES.contains(&genre) {
        errors.push(FieldError::new("genre", "Invalid genre"));
    }
}

fn validate_platform(platform: &[String], errors: &mut Vec<FieldError>) {
    if platform.is_empty() || platform.iter().all(|p| p.trim().is_empty()) {
        errors.push(FieldError::new(
            "platform",
            "At least one platform must be specified",
        ));
    }
}

fn validate_release_year(year: i32, errors: &mut Vec<FieldError>) {
    if year < MIN_RELEASE_YEAR {
        errors.push(FieldError::new(
            "releaseYear",
            format!("Release year must be {} or later", MIN_RELEASE_YEAR),
        ));
    } else if year > max_release_year() {
        errors.push(FieldError::new(
            "releaseYear",
            format!("Release year cannot exceed {}", max_release_year()),
        ));
    }
}

fn validate_rating(rating: f64, errors: &mut Vec<FieldError>) {
    if !(0.0..=10.0).contains(&rating) {
        errors.push(FieldError::new("rating", "Rating must be between 0 and 10"));
    }
}

fn validate_price(price: f64, errors: &mut Vec<FieldError>) {
    if price < 0.0 {
        errors.push(FieldError::new("price", "Price cannot be negative"));
    }
}
