//! JSON shape of a failed call, shared by the server and remote callers.

use domain::{CheckError, ErrorKind, ServiceError};
use serde::{Deserialize, Serialize};

/// Body returned with every non-2xx response.
///
/// Carries enough to rebuild the original [`ServiceError`] on the caller's
/// side, so a remote failure has the same kind and payload as a local one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ErrorBody {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
            entity: None,
            id: None,
        }
    }
}

impl From<&ServiceError> for ErrorBody {
    fn from(err: &ServiceError) -> Self {
        let kind = err.kind();
        match err {
            ServiceError::Check(check) => Self {
                field: Some(check.field.clone()),
                ..Self::new(kind, check.message.clone())
            },
            ServiceError::ObjectNotFound { entity, id }
            | ServiceError::DuplicateKey { entity, id } => Self {
                entity: Some(entity.clone()),
                id: Some(id.clone()),
                ..Self::new(kind, err.to_string())
            },
            ServiceError::Find(detail)
            | ServiceError::Create(detail)
            | ServiceError::Update(detail)
            | ServiceError::Remove(detail) => Self::new(kind, detail.clone()),
        }
    }
}

impl From<ErrorBody> for ServiceError {
    fn from(body: ErrorBody) -> Self {
        let entity = body.entity.unwrap_or_default();
        let id = body.id.unwrap_or_default();
        match body.kind {
            ErrorKind::Check => {
                ServiceError::Check(CheckError::new(body.field.unwrap_or_default(), body.message))
            }
            ErrorKind::ObjectNotFound => ServiceError::ObjectNotFound { entity, id },
            ErrorKind::DuplicateKey => ServiceError::DuplicateKey { entity, id },
            ErrorKind::Find => ServiceError::Find(body.message),
            ErrorKind::Create => ServiceError::Create(body.message),
            ErrorKind::Update => ServiceError::Update(body.message),
            ErrorKind::Remove => ServiceError::Remove(body.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_error_keeps_field() {
        let err = ServiceError::Check(CheckError::new("credit_card_number", "Invalid Visa card number"));
        let body = ErrorBody::from(&err);
        assert_eq!(body.field.as_deref(), Some("credit_card_number"));

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["kind"], "check");
        assert!(json.get("entity").is_none());

        let back: ErrorBody = serde_json::from_value(json).unwrap();
        assert_eq!(ServiceError::from(back), err);
    }

    #[test]
    fn not_found_keeps_entity_and_id() {
        let err = ServiceError::not_found("Order", "o1");
        let body = ErrorBody::from(&err);
        assert_eq!(body.message, "Order not found: o1");
        assert_eq!(ServiceError::from(body), err);
    }

    #[test]
    fn wrapped_store_failure_is_not_double_prefixed() {
        let err = ServiceError::Create("Order store rejected the write".to_string());
        let body = ErrorBody::from(&err);
        assert_eq!(body.message, "Order store rejected the write");
        assert_eq!(ServiceError::from(body), err);
    }
}
