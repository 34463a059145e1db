//! Dialogue languages and the tokens users type to select them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language code used for lookups before the user has picked one.
pub const DEFAULT_LANGUAGE_CODE: &str = "es";

const SPANISH_TOKENS: &[&str] = &["ES", "CAST", "CASTELLANO", "ESPAÑOL", "ESP"];
const CATALAN_TOKENS: &[&str] = &["CAT", "CATALAN", "CATALÀ"];

/// A language the dialogue can be conducted in.
///
/// Serialized as the code used to key the dialogue document (`es`, `ca`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Spanish (castellano).
    Es,
    /// Catalan.
    Ca,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Language; 2] = [Language::Es, Language::Ca];

    /// Returns the code keying this language in the dialogue document.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::Ca => "ca",
        }
    }

    /// Returns the accepted selection tokens, upper-cased.
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            Self::Es => SPANISH_TOKENS,
            Self::Ca => CATALAN_TOKENS,
        }
    }

    /// Resolves a user's selection message.
    ///
    /// Matching is exact membership after trimming and upper-casing, so
    /// `" español "` selects Spanish but `"espanol"` does not.
    pub fn from_token(input: &str) -> Option<Self> {
        let token = input.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|language| language.tokens().contains(&token.as_str()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
