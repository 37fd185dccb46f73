use std::borrow::Cow;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// A short confirmation returned by routes with nothing else to say.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Confirmation {
	pub message: Cow<'static, str>,
}

impl Confirmation {
	pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Deserializes a key that is present, so `null` becomes `Some(None)`.
///
/// Paired with `#[serde(default)]`, a missing key stays `None`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}
