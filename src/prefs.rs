//! Theme and collapsed catalog sections, kept between runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::PrefsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    /// Catalog section name to collapsed flag.
    #[serde(default)]
    pub collapsed_sections: BTreeMap<String, bool>,
}

/// Preferences backed by a YAML file. Storage problems are logged and never
/// reach the caller; without a usable file the defaults apply for this run.
#[derive(Debug)]
pub struct PrefsStore {
    path: Option<PathBuf>,
    prefs: Preferences,
}

impl PrefsStore {
    pub fn default_location() -> Option<PathBuf> {
        ProjectDirs::from("", "", "quizdesk").map(|dirs| dirs.config_dir().join("prefs.yaml"))
    }

    pub fn open(path: Option<PathBuf>) -> Self {
        let prefs = match path.as_deref() {
            Some(p) => match load(p) {
                Ok(prefs) => prefs,
                Err(e) => {
                    tracing::warn!(error = %e, "using default preferences");
                    Preferences::default()
                }
            },
            None => {
                tracing::warn!("no config directory; preferences will not be saved");
                Preferences::default()
            }
        };
        Self { path, prefs }
    }

    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            prefs: Preferences::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.prefs.theme = self.prefs.theme.toggled();
        self.persist();
        self.prefs.theme
    }

    pub fn is_collapsed(&self, section: &str) -> bool {
        self.prefs
            .collapsed_sections
            .get(section)
            .copied()
            .unwrap_or(false)
    }

    /// Flip a section and return its new collapsed state.
    pub fn toggle_section(&mut self, section: &str) -> bool {
        let collapsed = !self.is_collapsed(section);
        self.prefs
            .collapsed_sections
            .insert(section.to_string(), collapsed);
        self.persist();
        collapsed
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = save(path, &self.prefs) {
            tracing::warn!(error = %e, "cannot save preferences");
        }
    }
}

fn load(path: &Path) -> Result<Preferences, PrefsError> {
    if !path.exists() {
        return Ok(Preferences::default());
    }
    let content = fs::read_to_string(path).map_err(|source| PrefsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(Preferences::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

fn save(path: &Path, prefs: &Preferences) -> Result<(), PrefsError> {
    let io_err = |source| PrefsError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let yaml = serde_yaml::to_string(prefs)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, yaml).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}
