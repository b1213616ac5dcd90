use crate::utils::error::ApiError;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON body extractor that runs the DTO's validation rules before the
/// handler sees it. Malformed JSON and failed rules both surface as the
/// Validation error kind with field-level messages.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::Validation(flatten_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn flatten_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, detail)
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(email(message = "Valid email is required"))]
        email: String,
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn flatten_reports_every_failing_field() {
        let sample = Sample {
            email: "not-an-email".into(),
            name: String::new(),
        };
        let errors = sample.validate().unwrap_err();
        let flat = flatten_errors(&errors);
        assert!(flat.contains("email: Valid email is required"));
        assert!(flat.contains("name: Name is required"));
    }

    #[test]
    fn valid_dto_passes() {
        let sample = Sample {
            email: "a@b.com".into(),
            name: "A".into(),
        };
        assert!(sample.validate().is_ok());
    }
}
