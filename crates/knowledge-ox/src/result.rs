use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::ClientError;

/// Uniform outcome of every client operation.
///
/// Serializes to `{"ok": true, "data": ...}` or `{"ok": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult<T> {
    Ok(T),
    Err(String),
}

impl<T> ApiResult<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Err(message.into())
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ok(data) => Some(data),
            Self::Err(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Err(message) => Some(message),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Ok(data) => ApiResult::Ok(f(data)),
            Self::Err(message) => ApiResult::Err(message),
        }
    }

    /// Convert into a plain `Result` with the failure message as error
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Ok(data) => Ok(data),
            Self::Err(message) => Err(message),
        }
    }
}

impl<T> From<Result<T, ClientError>> for ApiResult<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(data) => Self::Ok(data),
            Err(e) => Self::Err(e.to_string()),
        }
    }
}

impl<T: Serialize> Serialize for ApiResult<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ApiResult", 2)?;
        match self {
            Self::Ok(data) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Err(message) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", message)?;
            }
        }
        state.end()
    }
}
