use crate::utils::error::{MapError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> MapError {
    MapError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Accepts absolute http(s) URLs only.
pub fn validate_url(field: &str, raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(invalid(field, raw, "URL cannot be empty"));
    }

    let url = Url::parse(raw).map_err(|e| invalid(field, raw, format!("Invalid URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            raw,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    Ok(())
}

pub fn validate_path(field: &str, path: &str) -> Result<()> {
    match path {
        "" => Err(invalid(field, path, "Path cannot be empty")),
        p if p.contains('\0') => Err(invalid(field, path, "Path contains null bytes")),
        _ => Ok(()),
    }
}

pub fn validate_positive_number(field: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// Secrets never echo their value back into the error.
pub fn validate_secret(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MapError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

/// A slug becomes `<slug>.png` inside the output directory, so it must stay a
/// single path component.
pub fn validate_slug(slug: &str) -> Result<()> {
    let trimmed = slug.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed.contains("..")
        || trimmed.contains(['/', '\\', '\0'])
    {
        return Err(MapError::InvalidSlug {
            slug: slug.to_string(),
        });
    }
    Ok(())
}
