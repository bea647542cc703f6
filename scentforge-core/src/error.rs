use scentforge_schemas::{category::UnknownCategory, request::ErrorEnvelope};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScentforgeError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    #[error("Ingredient '{id}' has an invalid {field}: {value}")]
    InvalidIngredient {
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("Catalog lookup failed: {0}")]
    CatalogUnavailable(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to write CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}

impl ScentforgeError {
    /// HTTP-style status for the wire envelope. Anything the caller can fix is a 400.
    pub fn status_code(&self) -> u16 {
        match self {
            ScentforgeError::Validation(_)
            | ScentforgeError::UnknownCategory(_)
            | ScentforgeError::InvalidIngredient { .. }
            | ScentforgeError::JsonParsing(_) => 400,
            _ => 500,
        }
    }

    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.to_string(),
            status: self.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_surface_verbatim_with_400() {
        let err = ScentforgeError::Validation("quantity must be a non-negative number".into());
        let envelope = err.to_envelope();
        assert_eq!(envelope.error, "quantity must be a non-negative number");
        assert_eq!(envelope.status, 400);
    }

    #[test]
    fn unknown_category_is_a_client_error() {
        let err: ScentforgeError = UnknownCategory("cat99".into()).into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Unknown IFRA category 'cat99'");
    }

    #[test]
    fn catalog_failures_are_server_errors() {
        let err = ScentforgeError::CatalogUnavailable("timeout".into());
        assert_eq!(err.status_code(), 500);
    }
}
