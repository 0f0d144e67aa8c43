/// Messages exchanged between the background coordinator and tab overlays
use serde::{Deserialize, Serialize};

/// A tagged message, serialized as `{"type": "ACTIVATE"}` etc.
///
/// `Activate` only travels coordinator -> tab, `GetRandomImage` only
/// tab -> coordinator. `Deactivate` travels both ways: the tab asks for it
/// (ESC pressed), the coordinator confirms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    Activate,
    Deactivate,
    GetRandomImage,
}

/// Reply to `GET_RANDOM_IMAGE`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomImageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RandomImageResponse {
    pub fn found(data_url: String) -> Self {
        RandomImageResponse {
            success: true,
            data_url: Some(data_url),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        RandomImageResponse {
            success: false,
            data_url: None,
            error: Some(error.into()),
        }
    }

    /// Collapse the wire shape into a `Result` for the overlay.
    pub fn into_result(self) -> Result<String, String> {
        match (self.success, self.data_url, self.error) {
            (true, Some(data_url), _) => Ok(data_url),
            (_, _, Some(error)) => Err(error),
            _ => Err("Malformed image response".to_string()),
        }
    }
}
