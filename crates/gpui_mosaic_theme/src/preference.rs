use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use gpui::{Global, WindowAppearance};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ThemeVariantKind, ThemeVariants};

/// The user's choice of light or dark appearance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the operating system appearance.
    #[default]
    System,
}

impl Global for ThemePreference {}

impl ThemePreference {
    /// Resolves the preference to a concrete variant kind.
    pub fn resolve(self, appearance: WindowAppearance) -> ThemeVariantKind {
        match self {
            Self::Light => ThemeVariantKind::Light,
            Self::Dark => ThemeVariantKind::Dark,
            Self::System => match appearance {
                WindowAppearance::Light | WindowAppearance::VibrantLight => ThemeVariantKind::Light,
                WindowAppearance::Dark | WindowAppearance::VibrantDark => ThemeVariantKind::Dark,
            },
        }
    }

    /// Picks the variant index for this preference, or the first variant when the theme
    /// has none of the wanted kind.
    pub fn variant_index(self, variants: &ThemeVariants, appearance: WindowAppearance) -> usize {
        variants.position_of(self.resolve(appearance)).unwrap_or(0)
    }

    /// Cycles light → dark → system, as a toggle button would.
    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::System,
            Self::System => Self::Light,
        }
    }
}

#[derive(Error, Debug)]
pub enum ThemeStoreError {
    #[error("failed to access theme preference file: {0}")]
    Io(#[from] io::Error),
    #[error("theme preference file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value storage for the persisted [`ThemePreference`].
pub trait ThemeStore: Send + Sync {
    fn load(&self) -> Result<Option<ThemePreference>, ThemeStoreError>;
    fn save(&self, preference: ThemePreference) -> Result<(), ThemeStoreError>;
}

#[derive(Serialize, Deserialize)]
struct StoredPreference {
    preference: ThemePreference,
}

/// Stores the preference as `{"preference": "dark"}` in a JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for JsonFileStore {
    fn load(&self) -> Result<Option<ThemePreference>, ThemeStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let stored: StoredPreference = serde_json::from_str(&contents)?;
        Ok(Some(stored.preference))
    }

    fn save(&self, preference: ThemePreference) -> Result<(), ThemeStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&StoredPreference { preference })?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// In-memory store, useful for tests and for apps that don't persist settings.
#[derive(Default)]
pub struct MemoryStore {
    preference: Mutex<Option<ThemePreference>>,
}

impl ThemeStore for MemoryStore {
    fn load(&self) -> Result<Option<ThemePreference>, ThemeStoreError> {
        Ok(*self.preference.lock().unwrap_or_else(|err| err.into_inner()))
    }

    fn save(&self, preference: ThemePreference) -> Result<(), ThemeStoreError> {
        *self.preference.lock().unwrap_or_else(|err| err.into_inner()) = Some(preference);
        Ok(())
    }
}

/// Loads the stored preference, falling back to [`ThemePreference::System`] when nothing
/// is stored or the store can't be read.
pub fn load_or_default(store: &dyn ThemeStore) -> ThemePreference {
    match store.load() {
        Ok(preference) => preference.unwrap_or_default(),
        Err(err) => {
            tracing::warn!("could not load theme preference, using system: {err}");
            ThemePreference::default()
        }
    }
}
