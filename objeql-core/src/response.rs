use crate::error::ObjeqlError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The wire response envelope: data on success, an error body on failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Response {
    pub data: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// The serialized form of an [`ObjeqlError`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_path: Option<Vec<String>>,

    /// Debug-mode detail; never emitted in production configurations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl Response {
    pub fn from_data(data: Value) -> Self {
        Response { data, error: None }
    }

    /// A failure envelope. `debug` controls whether the internal error
    /// detail is exposed in the `stack` member.
    pub fn from_error(error: &ObjeqlError, debug: bool) -> Self {
        let field_path = error
            .field_path()
            .filter(|path| !path.is_empty())
            .map(|path| path.segments().to_vec());
        Response {
            data: Value::Null,
            error: Some(ErrorBody {
                message: error.message(),
                field_path,
                stack: debug.then(|| format!("{:?}", error)),
            }),
        }
    }
}
