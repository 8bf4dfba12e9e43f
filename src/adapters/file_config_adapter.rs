//! INI configuration adapter for the `[convert]` and `[coerce]` sections.

use crate::domain::error::ReportError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    /// Load an INI file. Unreadable or malformed files are `ConfigParse`.
    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| ReportError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Self { ini })
    }

    pub fn from_string(content: &str) -> Result<Self, ReportError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| ReportError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { ini })
    }

    /// Configuration with no sections; every lookup falls back to defaults.
    pub fn empty() -> Self {
        Self { ini: Ini::new() }
    }

    /// Blank values count as unset.
    fn value(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get(section, key)
            .filter(|v| !v.trim().is_empty())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.value(section, key)
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(default)
    }

    fn get_char(&self, section: &str, key: &str) -> Option<char> {
        let value = self.value(section, key)?;
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}
