use serde::{Deserialize, Serialize};

/// Read scope a client asks for when listing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Everything the requester wrote, whatever its visibility.
    Me,
    /// What the partner addressed to the requester.
    Partner,
    /// The couple's shared feed, from both members.
    Couple,
    /// No scope, or one this server does not know: everything the requester
    /// is allowed to see.
    #[default]
    #[serde(other)]
    All,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Me => "me",
            Mode::Partner => "partner",
            Mode::Couple => "couple",
            Mode::All => "all",
        }
    }
}

/// Lenient parse: anything unrecognised reads as [`Mode::All`].
impl From<&str> for Mode {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "me" => Mode::Me,
            "partner" => Mode::Partner,
            "couple" => Mode::Couple,
            _ => Mode::All,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
