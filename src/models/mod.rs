//! Frontend Models
//!
//! Serde mirrors of the backend's JSON. The backend owns every entity; these
//! are cached copies.

mod analytics;
mod audit;
mod item;
mod procurement;
mod user;

pub use analytics::*;
pub use audit::*;
pub use item::*;
pub use procurement::*;
pub use user::*;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept strings, numbers and booleans for fields the backend stores
/// loosely (spreadsheet imports write numbers into text columns).
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Delete requests carry a mandatory reason
#[derive(Clone, Debug, Serialize)]
pub struct ReasonBody<'a> {
    pub reason: &'a str,
}

/// Generic `{"message": ...}` acknowledgement
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
