use serde::{Deserialize, Serialize};

/// Uniform wrapper returned to every caller.
///
/// `succeeded == true` with no data means the query worked but nothing
/// matched; a failed envelope never carries data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEnvelope<T> {
    succeeded: bool,
    failure_message: Option<String>,
    data: Option<T>,
}

impl<T> ServiceEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            succeeded: true,
            failure_message: None,
            data: Some(data),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            failure_message: Some(message.into()),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            failure_message: Some(message.into()),
            data: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.failure_message.as_deref()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
