/// User preferences synced across browser profiles.
///
/// Three independent documents (display, clock, language), each stored under
/// its own key and each with a hard-coded fallback returned when the key is
/// missing or unreadable. Writes are last-write-wins.
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
pub mod chrome_sync;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    #[error("preference storage failure: {0}")]
    Storage(String),
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// A settings document with a storage key and a fallback value
pub trait PreferenceDocument: Serialize + DeserializeOwned + Default + Clone {
    const KEY: &'static str;

    fn validate(&self) -> Result<(), PreferenceError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
}

impl ImageFit {
    /// Value for CSS `object-fit`
    pub fn css_value(self) -> &'static str {
        match self {
            ImageFit::Cover => "cover",
            ImageFit::Contain => "contain",
        }
    }

    pub fn from_css_value(value: &str) -> Option<ImageFit> {
        match value {
            "cover" => Some(ImageFit::Cover),
            "contain" => Some(ImageFit::Contain),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub image_fit: ImageFit,
    pub background_color: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            image_fit: ImageFit::Cover,
            background_color: "#000000".to_string(),
        }
    }
}

fn hex_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("static pattern"))
}

impl PreferenceDocument for DisplaySettings {
    const KEY: &'static str = "displaySettings";

    fn validate(&self) -> Result<(), PreferenceError> {
        if hex_color_pattern().is_match(&self.background_color) {
            Ok(())
        } else {
            Err(PreferenceError::Invalid {
                key: Self::KEY,
                reason: format!("background color {} is not #RRGGBB", self.background_color),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockSettings {
    pub enabled: bool,
    /// IANA timezone identifier
    pub timezone: String,
}

impl ClockSettings {
    /// Clock hidden, showing `timezone` once enabled. The browser builds its
    /// fallback this way from the machine's own timezone.
    pub fn hidden_in(timezone: &str) -> Self {
        ClockSettings {
            enabled: false,
            timezone: timezone.to_string(),
        }
    }
}

impl Default for ClockSettings {
    fn default() -> Self {
        ClockSettings::hidden_in("UTC")
    }
}

impl PreferenceDocument for ClockSettings {
    const KEY: &'static str = "clockSettings";

    fn validate(&self) -> Result<(), PreferenceError> {
        if self.timezone.trim().is_empty() {
            return Err(PreferenceError::Invalid {
                key: Self::KEY,
                reason: "timezone is empty".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
    Ja,
    De,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Ko, Locale::Ja, Locale::De];

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ko => "ko",
            Locale::Ja => "ja",
            Locale::De => "de",
        }
    }

    pub fn from_code(code: &str) -> Option<Locale> {
        Locale::ALL.into_iter().find(|l| l.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ko => "한국어",
            Locale::Ja => "日本語",
            Locale::De => "Deutsch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LanguageSettings {
    pub locale: Locale,
}

impl PreferenceDocument for LanguageSettings {
    const KEY: &'static str = "languageSettings";
}

/// Timezones offered in the settings page as (label, IANA id)
pub const TIMEZONES: &[(&str, &str)] = &[
    ("Seoul", "Asia/Seoul"),
    ("Tokyo", "Asia/Tokyo"),
    ("Beijing", "Asia/Shanghai"),
    ("Hong Kong", "Asia/Hong_Kong"),
    ("Singapore", "Asia/Singapore"),
    ("New Delhi", "Asia/Kolkata"),
    ("Dubai", "Asia/Dubai"),
    ("London", "Europe/London"),
    ("Paris", "Europe/Paris"),
    ("Berlin", "Europe/Berlin"),
    ("New York", "America/New_York"),
    ("Los Angeles", "America/Los_Angeles"),
    ("Chicago", "America/Chicago"),
    ("Sydney", "Australia/Sydney"),
    ("Auckland", "Pacific/Auckland"),
];

/// Raw synced key-value storage
#[async_trait(?Send)]
pub trait SyncStorage {
    async fn get_item(&self, key: &str) -> Result<Option<serde_json::Value>, PreferenceError>;

    async fn set_item(&self, key: &str, value: serde_json::Value) -> Result<(), PreferenceError>;
}

pub struct PreferenceStore<S> {
    storage: S,
}

impl<S: SyncStorage> PreferenceStore<S> {
    pub fn new(storage: S) -> Self {
        PreferenceStore { storage }
    }

    /// Read a document, falling back to its default when missing or malformed.
    ///
    /// Storage failures are still returned; callers that only render can
    /// use `unwrap_or_default`.
    pub async fn load<T: PreferenceDocument>(&self) -> Result<T, PreferenceError> {
        self.load_or(T::default()).await
    }

    /// Like `load`, with a fallback only known at runtime.
    pub async fn load_or<T: PreferenceDocument>(&self, fallback: T) -> Result<T, PreferenceError> {
        let Some(value) = self.storage.get_item(T::KEY).await? else {
            return Ok(fallback);
        };

        match serde_json::from_value::<T>(value) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                log::warn!("Ignoring malformed {}: {}", T::KEY, e);
                Ok(fallback)
            }
        }
    }

    pub async fn save<T: PreferenceDocument>(&self, doc: &T) -> Result<(), PreferenceError> {
        doc.validate()?;
        let value = serde_json::to_value(doc)
            .map_err(|e| PreferenceError::Storage(format!("Failed to serialize {}: {}", T::KEY, e)))?;
        self.storage.set_item(T::KEY, value).await?;
        log::info!("Saved {}", T::KEY);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemorySyncStorage;
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_fallbacks_when_absent() {
        let store = PreferenceStore::new(MemorySyncStorage::default());

        block_on(async {
            let display: DisplaySettings = store.load().await.unwrap();
            let clock: ClockSettings = store.load().await.unwrap();
            let language: LanguageSettings = store.load().await.unwrap();

            assert_eq!(display.image_fit, ImageFit::Cover);
            assert_eq!(display.background_color, "#000000");
            assert!(!clock.enabled);
            assert_eq!(clock.timezone, "UTC");
            assert_eq!(language.locale, Locale::En);
        });
    }

    #[test]
    fn test_runtime_fallback_for_clock() {
        let storage = MemorySyncStorage::default();
        let store = PreferenceStore::new(storage);
        let local = ClockSettings::hidden_in("Europe/Berlin");

        block_on(async {
            let loaded = store.load_or(local.clone()).await.unwrap();
            assert_eq!(loaded, local);

            store
                .storage
                .items
                .borrow_mut()
                .insert("clockSettings".to_string(), json!({"enabled": "yes"}));
            let loaded = store.load_or(local.clone()).await.unwrap();
            assert_eq!(loaded, local);

            let chosen = ClockSettings {
                enabled: true,
                timezone: "Asia/Tokyo".to_string(),
            };
            store.save(&chosen).await.unwrap();
            assert_eq!(store.load_or(local).await.unwrap(), chosen);
        });
    }

    #[test]
    fn test_save_then_load() {
        let store = PreferenceStore::new(MemorySyncStorage::default());
        let clock = ClockSettings {
            enabled: true,
            timezone: "Asia/Seoul".to_string(),
        };

        block_on(async {
            store.save(&clock).await.unwrap();
            let loaded: ClockSettings = store.load().await.unwrap();
            assert_eq!(loaded, clock);

            // other documents are untouched
            let display: DisplaySettings = store.load().await.unwrap();
            assert_eq!(display, DisplaySettings::default());
        });
    }

    #[test]
    fn test_stored_wire_format() {
        let storage = MemorySyncStorage::default();
        let store = PreferenceStore::new(storage);
        let display = DisplaySettings {
            image_fit: ImageFit::Contain,
            background_color: "#1A2B3C".to_string(),
        };

        block_on(store.save(&display)).unwrap();

        let items = store.storage.items.borrow();
        assert_eq!(
            items.get("displaySettings"),
            Some(&json!({"imageFit": "contain", "backgroundColor": "#1A2B3C"}))
        );
    }

    #[test]
    fn test_malformed_document_falls_back() {
        let storage = MemorySyncStorage::default();
        storage
            .items
            .borrow_mut()
            .insert("languageSettings".to_string(), json!({"locale": "xx"}));
        let store = PreferenceStore::new(storage);

        let language: LanguageSettings = block_on(store.load()).unwrap();
        assert_eq!(language.locale, Locale::En);
    }

    #[test]
    fn test_invalid_color_rejected() {
        let store = PreferenceStore::new(MemorySyncStorage::default());
        let display = DisplaySettings {
            image_fit: ImageFit::Cover,
            background_color: "black".to_string(),
        };

        let result = block_on(store.save(&display));
        assert!(matches!(result, Err(PreferenceError::Invalid { key: "displaySettings", .. })));
    }

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::from_code("ja"), Some(Locale::Ja));
        assert_eq!(Locale::from_code("fr"), None);
        assert!(Locale::ALL.iter().all(|l| Locale::from_code(l.code()) == Some(*l)));
    }

    #[test]
    fn test_timezone_list() {
        assert_eq!(TIMEZONES.len(), 15);
        assert!(TIMEZONES.iter().any(|(_, tz)| *tz == "Europe/Berlin"));
    }
}
