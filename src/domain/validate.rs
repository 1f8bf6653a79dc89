//! Scalar field constraints shared by all three entities.

use super::error::DomainError;

const TITLE_MAX_CHARS: usize = 30;
const DESCRIPTION_MAX_CHARS: usize = 255;

pub fn title(value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation("title must not be empty"));
    }
    if value.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "title exceeds {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn description(value: &str) -> Result<(), DomainError> {
    if value.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "description exceeds {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(())
}
