use std::fmt;

use serde::{Deserialize, Serialize};

/// Display and error-message language selected per request
///
/// Vietnamese is the primary locale; English the only alternative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Locale {
    /// Primary locale
    #[default]
    #[serde(rename = "vi")]
    Vietnamese,
    /// Secondary locale
    #[serde(rename = "en")]
    English,
}

impl Locale {
    /// Coerce an arbitrary language code into a supported locale
    ///
    /// Only `"en"` selects English; anything else, including absence,
    /// falls back to the primary locale.
    pub fn sanitize(raw: Option<&str>) -> Self {
        match raw {
            Some("en") => Self::English,
            _ => Self::Vietnamese,
        }
    }

    /// Wire code for this locale
    pub const fn code(self) -> &'static str {
        match self {
            Self::Vietnamese => "vi",
            Self::English => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, IgnoredAny};

        struct LocaleVisitor;

        impl<'de> de::Visitor<'de> for LocaleVisitor {
            type Value = Locale;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a language code")
            }

            fn visit_str<E>(self, v: &str) -> Result<Locale, E>
            where
                E: de::Error,
            {
                Ok(Locale::sanitize(Some(v)))
            }

            fn visit_bool<E>(self, _: bool) -> Result<Locale, E>
            where
                E: de::Error,
            {
                Ok(Locale::default())
            }

            fn visit_i64<E>(self, _: i64) -> Result<Locale, E>
            where
                E: de::Error,
            {
                Ok(Locale::default())
            }

            fn visit_u64<E>(self, _: u64) -> Result<Locale, E>
            where
                E: de::Error,
            {
                Ok(Locale::default())
            }

            fn visit_f64<E>(self, _: f64) -> Result<Locale, E>
            where
                E: de::Error,
            {
                Ok(Locale::default())
            }

            fn visit_unit<E>(self) -> Result<Locale, E>
            where
                E: de::Error,
            {
                Ok(Locale::default())
            }

            fn visit_none<E>(self) -> Result<Locale, E>
            where
                E: de::Error,
            {
                Ok(Locale::default())
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Locale, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Locale::default())
            }

            fn visit_map<A>(self, mut map: A) -> Result<Locale, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(Locale::default())
            }
        }

        deserializer.deserialize_any(LocaleVisitor)
    }
}
