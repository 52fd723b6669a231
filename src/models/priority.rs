use serde::Serialize;
use std::fmt;

/// Seat selection policy requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Default,
    Together,
    Comfort,
}

impl Priority {
    /// Decodes a client-supplied priority. Anything unrecognised falls back to `Default`.
    pub fn decode(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "together" => Priority::Together,
            "comfort" => Priority::Comfort,
            _ => Priority::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Default => "default",
            Priority::Together => "together",
            Priority::Comfort => "comfort",
        }
    }
}

impl From<Option<&str>> for Priority {
    fn from(raw: Option<&str>) -> Self {
        raw.map(Priority::decode).unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_modes() {
        assert_eq!(Priority::decode("default"), Priority::Default);
        assert_eq!(Priority::decode("together"), Priority::Together);
        assert_eq!(Priority::decode("comfort"), Priority::Comfort);
        assert_eq!(Priority::decode(" Comfort "), Priority::Comfort);
    }

    #[test]
    fn unknown_modes_fall_back_to_default() {
        assert_eq!(Priority::decode(""), Priority::Default);
        assert_eq!(Priority::decode("window-please"), Priority::Default);
        assert_eq!(Priority::from(None), Priority::Default);
    }
}
