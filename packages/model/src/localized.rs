use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language used when a requested translation is missing
pub const FALLBACK_LANGUAGE: &str = "en";

/// Localized text keyed by language code (`"en"`, `"de"`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedString(pub BTreeMap<String, String>);

impl LocalizedString {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Single-language string
    pub fn with(lang: impl Into<String>, text: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(lang.into(), text.into());
        Self(map)
    }

    pub fn insert(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        self.0.insert(lang.into(), text.into());
    }

    /// Text for `lang`, falling back to English and then to any translation
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0
            .get(lang)
            .or_else(|| self.0.get(FALLBACK_LANGUAGE))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
