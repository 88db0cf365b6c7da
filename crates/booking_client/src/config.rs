use std::{collections::HashMap, fs, path::Path, sync::Arc, time::Duration};

use tracing::warn;

use crate::{
    error::BookingError,
    transport::{BookingService, HttpBookingService, MissingBookingService},
    types::{DEFAULT_NO_SLOTS_LABEL, DEFAULT_PLACEHOLDER_LABEL},
    ControllerOptions,
};

pub const SETTINGS_FILE: &str = "booking.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: Option<String>,
    pub request_timeout_ms: u64,
    pub placeholder_label: String,
    pub no_slots_label: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: None,
            request_timeout_ms: 10_000,
            placeholder_label: DEFAULT_PLACEHOLDER_LABEL.into(),
            no_slots_label: DEFAULT_NO_SLOTS_LABEL.into(),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            request_timeout: self.request_timeout(),
            placeholder_label: self.placeholder_label.clone(),
            no_slots_label: self.no_slots_label.clone(),
        }
    }

    pub fn build_service(&self) -> Result<Arc<dyn BookingService>, BookingError> {
        match self.server_url.as_deref() {
            Some(url) => Ok(Arc::new(HttpBookingService::new(
                url,
                self.request_timeout(),
            )?)),
            None => {
                warn!("booking server url not configured; lookups will fail");
                Ok(Arc::new(MissingBookingService))
            }
        }
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `key = "value"` table at `path`, then `env`.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file_values(&mut settings, &file_cfg),
            Err(err) => warn!(path = %path.display(), %err, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("BOOKING_SERVER_URL") {
        settings.server_url = Some(v);
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = Some(v);
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_ms = parsed,
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__REQUEST_TIMEOUT_MS"),
        }
    }
    if let Some(v) = env("APP__PLACEHOLDER_LABEL") {
        settings.placeholder_label = v;
    }
    if let Some(v) = env("APP__NO_SLOTS_LABEL") {
        settings.no_slots_label = v;
    }

    settings
}

fn apply_file_values(settings: &mut ClientSettings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = Some(v.to_string());
    }
    if let Some(v) = file_cfg
        .get("request_timeout_ms")
        .and_then(toml::Value::as_integer)
        .and_then(|ms| u64::try_from(ms).ok())
    {
        settings.request_timeout_ms = v;
    }
    if let Some(v) = file_cfg.get("placeholder_label").and_then(toml::Value::as_str) {
        settings.placeholder_label = v.to_string();
    }
    if let Some(v) = file_cfg.get("no_slots_label").and_then(toml::Value::as_str) {
        settings.no_slots_label = v.to_string();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_settings_file(name: &str, contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("booking_client_{name}_{suffix}.toml"));
        fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let settings = load_settings_from(Path::new("/nonexistent/booking.toml"), |_| None);
        assert_eq!(settings, ClientSettings::default());
        assert_eq!(settings.placeholder_label, "-- Seleccione --");
    }

    #[test]
    fn file_values_override_defaults() {
        let path = temp_settings_file(
            "file_values",
            "server_url = \"http://clinic.local:8069\"\nrequest_timeout_ms = 2500\nno_slots_label = \"No slots\"\n",
        );
        let settings = load_settings_from(&path, |_| None);
        assert_eq!(settings.server_url.as_deref(), Some("http://clinic.local:8069"));
        assert_eq!(settings.request_timeout(), Duration::from_millis(2500));
        assert_eq!(settings.no_slots_label, "No slots");
        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn env_overrides_file() {
        let path = temp_settings_file("env_overrides", "server_url = \"http://from-file\"\n");
        let settings = load_settings_from(&path, |key| match key {
            "APP__SERVER_URL" => Some("http://from-env".to_string()),
            "APP__REQUEST_TIMEOUT_MS" => Some("not-a-number".to_string()),
            _ => None,
        });
        assert_eq!(settings.server_url.as_deref(), Some("http://from-env"));
        assert_eq!(settings.request_timeout_ms, 10_000);
        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn missing_server_url_builds_failing_service() {
        let settings = ClientSettings::default();
        assert!(settings.build_service().is_ok());
        let bad = ClientSettings {
            server_url: Some("not a url".to_string()),
            ..ClientSettings::default()
        };
        assert!(matches!(
            bad.build_service(),
            Err(BookingError::InvalidServerUrl(_))
        ));
    }
}
