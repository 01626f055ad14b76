use crate::core::palindrome::is_palindrome;
use crate::domain::model::{CollectorForm, PalindromeForm};
use crate::utils::error::{GalleryError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use url::Url;

/// Largest accepted plate photo.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Content types the admin form accepts.
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

pub const MAX_PLATE_CHARS: usize = 20;
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_LOCATION_CHARS: usize = 200;
pub const MAX_BIO_CHARS: usize = 1000;
pub const MAX_NOTES_CHARS: usize = 1000;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(GalleryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GalleryError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(GalleryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GalleryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(GalleryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GalleryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(GalleryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Expected one of: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// Field-keyed form errors, shown next to the offending inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    pub errors: BTreeMap<String, String>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    fn reject(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }
}

pub fn validate_palindrome_form(form: &PalindromeForm) -> FormValidation {
    let mut result = FormValidation::default();

    if form.license_plate.trim().is_empty() {
        result.reject("license_plate", "License plate is required");
    } else if too_long(&form.license_plate, MAX_PLATE_CHARS) {
        result.reject("license_plate", "License plate must be 20 characters or less");
    } else if !is_palindrome(&form.license_plate) {
        result.reject("license_plate", "License plate must be a palindrome");
    }

    if form.collector_id.trim().is_empty() {
        result.reject("collector_id", "Collector must be selected");
    }

    match &form.image {
        None => result.reject("image", "Image is required"),
        Some(image) => {
            if !ACCEPTED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
                result.reject("image", "Image must be JPEG, PNG, or WebP");
            }
            // size wins when both checks fail
            if image.size() > MAX_IMAGE_BYTES {
                result.reject("image", "Image must be less than 5MB");
            }
        }
    }

    result
}

pub fn validate_collector_form(form: &CollectorForm) -> FormValidation {
    let mut result = FormValidation::default();

    if form.name.trim().is_empty() {
        result.reject("name", "Name is required");
    } else if too_long(&form.name, MAX_NAME_CHARS) {
        result.reject("name", "Name must be 100 characters or less");
    }

    if let Some(email) = form.email.as_deref().map(str::trim) {
        if !email.is_empty() && !is_email(email) {
            result.reject("email", "Please enter a valid email");
        }
    }

    let limits = [
        ("location", &form.location, MAX_LOCATION_CHARS, "Location must be 200 characters or less"),
        ("bio", &form.bio, MAX_BIO_CHARS, "Bio must be 1000 characters or less"),
        ("notes", &form.notes, MAX_NOTES_CHARS, "Notes must be 1000 characters or less"),
    ];
    for (field, value, max, message) in limits {
        if value.as_deref().is_some_and(|v| too_long(v, max)) {
            result.reject(field, message);
        }
    }

    result
}

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

fn is_email(value: &str) -> bool {
    Regex::new(EMAIL_PATTERN)
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}
