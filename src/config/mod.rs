use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name of the optional configuration object on `window`.
pub(crate) const WINDOW_CONFIG_KEY: &str = "CONTACTS_UI";

/// Element identifiers, timings and thresholds the page controller binds with.
///
/// Defaults match the markup rendered by the contact manager's templates.
/// A host page can override any subset through `window.CONTACTS_UI`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub overlay_id: String,
    pub overlay_form_id: String,
    pub overlay_name_id: String,
    pub overlay_active_class: String,

    pub file_input_selector: String,
    pub file_label_id: String,

    pub flash_selector: String,
    pub flash_delay_ms: u32,
    pub flash_fade_ms: u32,

    pub guarded_form_selector: String,
    pub phone_field_id: String,
    pub phone_min_len: usize,

    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            overlay_id: "deleteModal".to_string(),
            overlay_form_id: "deleteForm".to_string(),
            overlay_name_id: "contactName".to_string(),
            overlay_active_class: "active".to_string(),
            file_input_selector: "input[type=file]".to_string(),
            file_label_id: "fileName".to_string(),
            flash_selector: ".alert".to_string(),
            flash_delay_ms: 5000,
            flash_fade_ms: 500,
            guarded_form_selector: ".contact-form".to_string(),
            phone_field_id: "phone_number".to_string(),
            phone_min_len: 10,
            log_level: "info".to_string(),
        }
    }
}

impl PageConfig {
    /// Reads `window.CONTACTS_UI`, falling back to defaults for anything
    /// missing or malformed.
    pub fn from_window() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };

        let Some(raw) = window.get(WINDOW_CONFIG_KEY) else {
            return Self::default();
        };
        if raw.is_undefined() || !raw.is_object() {
            return Self::default();
        }

        js_sys::JSON::stringify(&raw)
            .ok()
            .and_then(|s| s.as_string())
            .map(|json| Self::from_json(&json))
            .unwrap_or_default()
    }

    pub(crate) fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_default()
    }

    pub fn flash_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.flash_delay_ms))
    }

    pub fn flash_fade(&self) -> Duration {
        Duration::from_millis(u64::from(self.flash_fade_ms))
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
