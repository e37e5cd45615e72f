use crate::core::schedule::OutputFormat;
use crate::utils::error::{PlanError, Result};
use std::str::FromStr;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Names that become `<name>.<ext>` inside the output directory.
pub fn validate_file_stem(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;

    let reason = if name.contains(['/', '\\']) {
        Some("Names are used as file names and cannot contain path separators")
    } else if name.contains('\0') {
        Some("Name contains null bytes")
    } else if name == "." || name == ".." {
        Some("Name cannot be a relative directory reference")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_formats(field_name: &str, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    for format in formats {
        OutputFormat::from_str(format).map_err(|_| PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format.clone(),
            reason: format!(
                "Unsupported format. Valid formats: {}",
                OutputFormat::NAMES.join(", ")
            ),
        })?;
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PlanError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PlanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
