//! Configuration types for the Spark assistant.
//!
//! Configuration is layered: built-in defaults, then an optional `spark.json`,
//! then environment variables, then whatever the caller overrides. At runtime
//! it only changes through [`Config::apply`] with a [`ConfigUpdate`] patch.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SparkError};
use crate::mode::{Mode, TeachingStyle};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "spark.json";

/// Environment variable selecting the initial mode.
pub const ENV_DEFAULT_MODE: &str = "DEFAULT_MODE";
/// Environment variable naming the course.
pub const ENV_COURSE_NAME: &str = "COURSE_NAME";
/// Environment variable for the sampling temperature.
pub const ENV_LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
/// Environment variable for the response token cap.
pub const ENV_LLM_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
/// Environment variable pointing at the materials root.
pub const ENV_COURSE_MATERIALS_DIR: &str = "COURSE_MATERIALS_DIR";

/// Highest temperature accepted by validation and updates.
const MAX_TEMPERATURE: f32 = 2.0;

fn default_course_name() -> String {
    "Introduction to AI".to_string()
}

fn default_materials_dir() -> PathBuf {
    PathBuf::from("course_materials")
}

const fn default_temperature() -> f32 {
    0.3
}

const fn default_max_tokens() -> u32 {
    150
}

fn temperature_in_range(temperature: f32) -> bool {
    (0.0..=MAX_TEMPERATURE).contains(&temperature)
}

/// Main configuration for the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Active teaching mode.
    #[serde(default)]
    pub mode: Mode,

    /// Tone used with students.
    #[serde(default)]
    pub teaching_style: TeachingStyle,

    /// Free-form instructions from the educator, appended to the prompt.
    #[serde(default)]
    pub custom_instructions: String,

    /// Course name used in the assistant's identity statement.
    #[serde(default = "default_course_name")]
    pub course_name: String,

    /// Generation parameters handed to the language model.
    #[serde(default)]
    pub llm_params: LlmParams,

    /// Root directory holding course materials.
    #[serde(default = "default_materials_dir")]
    pub materials_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            teaching_style: TeachingStyle::default(),
            custom_instructions: String::new(),
            course_name: default_course_name(),
            llm_params: LlmParams::default(),
            materials_dir: default_materials_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `spark.json` in the current directory and falls back to the
    /// defaults when it is absent. Environment variables are not applied; see
    /// [`Config::with_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            SparkError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `spark.json` in a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the defaults. Missing keys take their defaults,
    /// unknown keys are ignored, and an unknown `mode` or `teachingStyle`
    /// falls back to `faq` / `supportive` with a warning.
    ///
    /// # Errors
    ///
    /// Returns `SparkError::ConfigParseError` if the file cannot be read or
    /// contains invalid JSON.
    ///
    /// Returns `SparkError::ConfigValidationError` if a value is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(SparkError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| SparkError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Overlays the process environment on top of this configuration.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlays values from `lookup` (keyed by the `ENV_*` names).
    ///
    /// An unknown mode falls back to `faq`, matching how the assistant treats
    /// unknown modes everywhere else. Numbers that do not parse are ignored
    /// with a warning.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup(ENV_DEFAULT_MODE) {
            self.mode = Mode::from_key_or_default(&mode);
        }

        if let Some(name) = lookup(ENV_COURSE_NAME) {
            self.course_name = name;
        }

        if let Some(raw) = lookup(ENV_LLM_TEMPERATURE) {
            match raw.trim().parse::<f32>() {
                Ok(temperature) => self.llm_params.temperature = temperature,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring {ENV_LLM_TEMPERATURE}"),
            }
        }

        if let Some(raw) = lookup(ENV_LLM_MAX_TOKENS) {
            match raw.trim().parse::<u32>() {
                Ok(max_tokens) => self.llm_params.max_tokens = max_tokens,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring {ENV_LLM_MAX_TOKENS}"),
            }
        }

        if let Some(dir) = lookup(ENV_COURSE_MATERIALS_DIR) {
            self.materials_dir = PathBuf::from(dir);
        }

        self
    }

    /// Validates the configuration values.
    ///
    /// - `llmParams.temperature` must be within `0.0..=2.0`
    /// - `llmParams.maxTokens` must be greater than 0
    /// - `courseName` must not be blank
    /// - `materialsDir` must not be empty
    ///
    /// # Errors
    ///
    /// Returns `SparkError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if !temperature_in_range(self.llm_params.temperature) {
            return Err(SparkError::config_validation(
                format!(
                    "llmParams.temperature must be between 0.0 and {MAX_TEMPERATURE}, got {}",
                    self.llm_params.temperature
                ),
                "Use a temperature such as 0.3 in spark.json or LLM_TEMPERATURE",
            ));
        }

        if self.llm_params.max_tokens == 0 {
            return Err(SparkError::config_validation(
                "llmParams.maxTokens must be greater than 0",
                "Set llmParams.maxTokens to at least 1 in spark.json or LLM_MAX_TOKENS",
            ));
        }

        if self.course_name.trim().is_empty() {
            return Err(SparkError::config_validation(
                "courseName must not be empty",
                "Provide the course name in spark.json or COURSE_NAME",
            ));
        }

        if self.materials_dir.as_os_str().is_empty() {
            return Err(SparkError::config_validation(
                "materialsDir must not be empty",
                "Point materialsDir or COURSE_MATERIALS_DIR at your course materials folder",
            ));
        }

        Ok(())
    }

    /// Returns a copy of this configuration with `update` applied.
    ///
    /// Unknown mode or style values, out-of-range temperatures, zero token
    /// caps and blank course names are ignored and the prior value kept.
    #[must_use]
    pub fn apply(&self, update: &ConfigUpdate) -> Self {
        let mut next = self.clone();

        if let Some(key) = &update.mode {
            match Mode::from_key(key) {
                Some(mode) => next.mode = mode,
                None => debug!(value = %key, "Ignoring unknown mode"),
            }
        }

        if let Some(key) = &update.teaching_style {
            match TeachingStyle::from_key(key) {
                Some(style) => next.teaching_style = style,
                None => debug!(value = %key, "Ignoring unknown teaching style"),
            }
        }

        if let Some(instructions) = &update.custom_instructions {
            next.custom_instructions.clone_from(instructions);
        }

        if let Some(name) = &update.course_name {
            if name.trim().is_empty() {
                debug!("Ignoring blank course name");
            } else {
                next.course_name.clone_from(name);
            }
        }

        if let Some(params) = &update.llm_params {
            if let Some(temperature) = params.temperature {
                if temperature_in_range(temperature) {
                    next.llm_params.temperature = temperature;
                } else {
                    debug!(temperature, "Ignoring out-of-range temperature");
                }
            }
            match params.max_tokens {
                Some(0) => debug!("Ignoring zero maxTokens"),
                Some(max_tokens) => next.llm_params.max_tokens = max_tokens,
                None => {}
            }
        }

        next
    }
}

/// Generation parameters for the language model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmParams {
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmParams {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// A partial configuration change, as posted by the educator.
///
/// Enum values stay strings here so an unknown value can be ignored instead
/// of rejecting the whole request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    /// New mode key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// New teaching style key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaching_style: Option<String>,
    /// Replacement educator instructions (an empty string clears them).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    /// New course name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    /// Generation parameter changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_params: Option<LlmParamsUpdate>,
}

/// Partial change to [`LlmParams`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmParamsUpdate {
    /// New sampling temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// New response token cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}
