use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Locale;

/// Body accepted by the generation endpoint
///
/// Missing, `null` or non-string `imageDataUrl` and `name` deserialize as
/// empty strings so the endpoint can reject them with a validation error
/// instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Source photo as a data URL
    #[serde(default, deserialize_with = "string_or_empty")]
    pub image_data_url: String,
    /// Name printed on the figure packaging
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    /// Requested locale; unknown values fall back to the primary locale
    #[serde(default)]
    pub language: Locale,
    /// Per-request credential overriding the server default
    #[serde(
        default,
        alias = "apiKey",
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_credential"
    )]
    pub credential: Option<SecretString>,
}

/// Successful generation envelope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Generated figure as a data URL
    pub image_url: String,
}

/// Failure envelope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}

/// Reads a string field, treating `null` and non-string values as empty
fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, IgnoredAny};

    struct StringOrEmpty;

    impl<'de> de::Visitor<'de> for StringOrEmpty {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a string")
        }

        fn visit_str<E>(self, v: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(v.to_owned())
        }

        fn visit_string<E>(self, v: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_bool<E>(self, _: bool) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_i64<E>(self, _: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_u64<E>(self, _: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_f64<E>(self, _: f64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_unit<E>(self) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<String, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(String::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<String, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(StringOrEmpty)
}

fn expose_credential<S>(credential: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match credential {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}
