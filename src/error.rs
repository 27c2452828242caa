use serde::Serialize;
use thiserror::Error;

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Typed failures raised while coercing a single field. The underlying
/// parse failure, when there is one, stays reachable through `source()`.
#[derive(Debug, Error)]
pub enum CoercionError {
    #[error("Custom parameter \"{title}\" is required")]
    Required { title: String },

    #[error("\"{title}\" parameter expects {expected}")]
    TypeMismatch {
        title: String,
        expected: &'static str,
    },

    #[error("Can't parse \"{title}\" parameter item at index {index} as {type_name} type: {source}")]
    ItemParse {
        title: String,
        index: usize,
        type_name: String,
        #[source]
        source: BoxedCause,
    },

    #[error("Can't parse \"{title}\" parameter value at key \"{key}\" as {type_name} type: {source}")]
    EntryParse {
        title: String,
        key: String,
        type_name: String,
        #[source]
        source: BoxedCause,
    },

    #[error("Can't parse \"{title}\" parameter value as {type_name} type: {source}")]
    ValueParse {
        title: String,
        type_name: String,
        #[source]
        source: BoxedCause,
    },
}

/// Failure a node's user logic can raise when it wants a stable name/code to
/// surface in the stored error snapshot.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CodedError {
    pub name: String,
    pub code: Option<String>,
    pub message: String,
}

impl CodedError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Flattened, serializable snapshot of a failure — what gets written to the
/// host's variable store, never the live error itself.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub name: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub stack: Option<String>,
}

impl ErrorInfo {
    pub fn from_error(err: &anyhow::Error) -> Self {
        let stack = Some(format!("{err:?}"));
        if let Some(coded) = err.downcast_ref::<CodedError>() {
            Self {
                name: Some(coded.name.clone()),
                code: coded.code.clone(),
                message: Some(coded.message.clone()),
                stack,
            }
        } else {
            Self {
                name: Some("Error".to_string()),
                code: None,
                message: Some(err.to_string()),
                stack,
            }
        }
    }
}
