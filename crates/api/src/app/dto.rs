//! Wire codec for the user resource.
//!
//! Responses serialize `userbase_core::User` directly (see its serde
//! attributes); this module only handles request decoding.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use userbase_core::UserProfile;

use crate::app::errors::{ApiError, INVALID_JSON};

// -------------------------
// Request DTOs
// -------------------------

/// The members of a JSON object in document order, duplicates included.
///
/// Keys are matched against field names after decoding, so every member has
/// to survive until then.
#[derive(Debug, Default)]
pub struct UserPayload(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for UserPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = UserPayload;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(UserPayload(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl TryFrom<UserPayload> for UserProfile {
    type Error = ApiError;

    /// Keys match field names ignoring ASCII case and later members
    /// overwrite earlier ones. Unknown keys (including `id`) are skipped and
    /// a `null` member leaves the field as it was.
    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        let mut profile = UserProfile::default();
        for (key, value) in payload.0 {
            if value.is_null() {
                continue;
            }
            if key.eq_ignore_ascii_case("firstName") {
                profile.first_name = text(value)?;
            } else if key.eq_ignore_ascii_case("lastName") {
                profile.last_name = text(value)?;
            } else if key.eq_ignore_ascii_case("email") {
                profile.email = text(value)?;
            } else if key.eq_ignore_ascii_case("password") {
                profile.password = text(value)?;
            } else if key.eq_ignore_ascii_case("age") {
                profile.age = value.as_i64().ok_or(ApiError::RequestMalformed(INVALID_JSON))?;
            }
        }
        Ok(profile)
    }
}

fn text(value: Value) -> Result<String, ApiError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ApiError::RequestMalformed(INVALID_JSON)),
    }
}

/// Decode a request body into a profile.
///
/// Reads the first JSON value only; anything after it is ignored. A bare
/// `null` decodes to the all-default profile. Empty or malformed bodies,
/// non-object values and wrongly-typed fields are `RequestMalformed`.
pub fn decode_user(body: &[u8]) -> Result<UserProfile, ApiError> {
    let mut values = serde_json::Deserializer::from_slice(body).into_iter::<Option<UserPayload>>();
    match values.next() {
        Some(Ok(payload)) => payload.unwrap_or_default().try_into(),
        Some(Err(e)) => {
            tracing::debug!(error = %e, "rejecting user payload");
            Err(ApiError::RequestMalformed(INVALID_JSON))
        }
        None => Err(ApiError::RequestMalformed(INVALID_JSON)),
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct GreetingMessage {
    pub message: String,
}
