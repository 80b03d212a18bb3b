use crate::error::{FieldPath, ObjeqlError, QueryErrorKind};
use crate::json_ext::Object;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An engine request: a JSON object with exactly one top-level key, the
/// operation name, whose value is the selection to run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Request {
    pub body: Object,
}

impl Request {
    pub fn new(body: Object) -> Self {
        Request { body }
    }

    /// Splits the body into its single (operation, selection) pair.
    pub fn operation(&self) -> Result<(&str, &Value), ObjeqlError> {
        let mut entries = self.body.iter();
        match (entries.next(), entries.next()) {
            (Some((name, selection)), None) => Ok((name.as_str(), selection)),
            _ => Err(ObjeqlError::query(
                QueryErrorKind::ExactlyOneOperation,
                &FieldPath::new(),
            )),
        }
    }
}

impl From<Object> for Request {
    fn from(body: Object) -> Self {
        Request::new(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> Request {
        serde_json::from_value(value).expect("request body")
    }

    #[test]
    fn single_operation_splits() {
        let request = request(json!({"getUser": {"id": true}}));
        let (name, selection) = request.operation().expect("one operation");
        assert_eq!(name, "getUser");
        assert_eq!(*selection, json!({"id": true}));
    }

    #[test]
    fn zero_or_many_operations_are_rejected() {
        assert!(request(json!({})).operation().is_err());
        let err = request(json!({"a": true, "b": true}))
            .operation()
            .unwrap_err();
        assert_eq!(err.message(), "Exactly 1 root operation required");
    }
}
