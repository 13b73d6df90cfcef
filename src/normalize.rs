use crate::error::PredictError;

/// Shortest accepted name, in characters, after normalization.
pub const MIN_NAME_CHARS: usize = 2;

/// Trims and lowercases a raw name, rejecting anything shorter than
/// [`MIN_NAME_CHARS`].
pub fn normalize_name(raw: &str) -> Result<String, PredictError> {
    let name = raw.trim().to_lowercase();
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(PredictError::InputTooShort {
            min: MIN_NAME_CHARS,
        });
    }
    Ok(name)
}
