use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

/// Errors produced when decomposing a data URL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUrlError {
    /// Input does not match `data:image/<subtype>;base64,<payload>`
    #[error("Invalid image data URL format. Expected 'data:image/...;base64,...'")]
    Malformed,
}

/// Inline image content in `data:<mime>;base64,<payload>` form
///
/// The payload is kept verbatim; it is never decoded, so parsing and
/// re-rendering a data URL is byte-identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime_type: String,
    data: String,
}

impl DataUrl {
    /// Build from a MIME type and an already base64-encoded payload
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Decompose a data URL into its MIME type and payload
    ///
    /// # Errors
    ///
    /// Returns `DataUrlError::Malformed` if the input is not an image
    /// data URL with a non-empty base64 payload
    pub fn parse(input: &str) -> Result<Self, DataUrlError> {
        fn re() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new(r"^data:(image/[A-Za-z0-9_.+-]+);base64,(.+)$").expect("must be valid regex"))
        }

        let captures = re().captures(input).ok_or(DataUrlError::Malformed)?;

        match (captures.get(1), captures.get(2)) {
            (Some(mime_type), Some(data)) => Ok(Self::new(mime_type.as_str(), data.as_str())),
            _ => Err(DataUrlError::Malformed),
        }
    }

    /// MIME type (e.g. `image/png`)
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Split into `(mime_type, data)`
    pub fn into_parts(self) -> (String, String) {
        (self.mime_type, self.data)
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

impl FromStr for DataUrl {
    type Err = DataUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
