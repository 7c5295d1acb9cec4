// Import necessary libraries and modules for file I/O and serialization.
use crate::constants::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use crate::error::{AIError, AppError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// Directory holding settings.json and log.txt.
pub fn get_data_dir() -> Result<PathBuf, AppError> {
    dir::home_dir()
        .map(|home| home.join("story_weaver").join("data"))
        .ok_or(AppError::NoHomeDirectory)
}

// Define a structure to hold application settings with serialization and deserialization capabilities.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub openai_api_key: Option<String>, // Optional API key for OpenAI services.
    pub text_model: String,
    pub image_model: String,
    pub image_generation_enabled: bool, // Image generation needs a billed quota, so it starts off.
    pub debug_mode: bool, // Debug-level lines in log.txt.
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            openai_api_key: None,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_generation_enabled: false,
            debug_mode: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_path() -> Result<PathBuf, AppError> {
        Ok(get_data_dir()?.join("settings.json"))
    }

    // Load settings from the default location, falling back to defaults when there is no file yet.
    pub fn load() -> Result<Self, AppError> {
        let path = Self::default_path()?;
        match Self::load_settings_from_file(&path) {
            Ok(settings) => Ok(settings),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.save_to_file(Self::default_path()?)?;
        Ok(())
    }

    pub fn load_settings_from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?; // Create the directory if it doesn't exist.
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    // The environment wins over the stored key. Blank values count as missing.
    pub fn resolve_api_key(&self) -> Result<String, AIError> {
        std::env::var(API_KEY_ENV)
            .ok()
            .into_iter()
            .chain(self.openai_api_key.clone())
            .find(|key| !key.trim().is_empty())
            .ok_or(AIError::MissingApiKey)
    }
}
