//! Teaching modes and styles.
//!
//! A mode scopes which course materials are used and how the assistant
//! behaves; a style shapes its tone. Both parse case-insensitively and fall
//! back to their defaults on unknown input, including when deserialized from
//! a config file.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The teaching context the assistant is operating in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// Logistics: syllabus, policies, schedule (default).
    #[default]
    Faq,
    /// Guided homework support.
    Assignment,
    /// Office-hours style questions about lecture notes.
    Lecture,
}

impl Mode {
    /// Every mode, in display order.
    pub const ALL: [Self; 3] = [Self::Faq, Self::Assignment, Self::Lecture];

    /// Stable key used in config files and the API.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Faq => "faq",
            Self::Assignment => "assignment",
            Self::Lecture => "lecture",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Faq => "Course FAQ",
            Self::Assignment => "Assignment Help",
            Self::Lecture => "Lecture Q&A",
        }
    }

    /// One-line description shown next to the label.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Faq => "Syllabus, policies, schedule",
            Self::Assignment => "Guided homework support",
            Self::Lecture => "24/7 office hours",
        }
    }

    /// Materials subdirectory, or `None` for root-level files only.
    #[must_use]
    pub const fn subdirectory(self) -> Option<&'static str> {
        match self {
            Self::Faq => None,
            Self::Assignment => Some("assignments"),
            Self::Lecture => Some("lectures"),
        }
    }

    /// Parses a mode key, case-insensitively.
    #[must_use]
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "faq" => Some(Self::Faq),
            "assignment" => Some(Self::Assignment),
            "lecture" => Some(Self::Lecture),
            _ => None,
        }
    }

    /// Parses a mode key, falling back to [`Mode::Faq`] with a warning.
    #[must_use]
    pub fn from_key_or_default(s: &str) -> Self {
        Self::from_key(s).unwrap_or_else(|| {
            warn!(value = %s, "Unknown mode, falling back to faq");
            Self::default()
        })
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| {
            format!("invalid mode '{s}': expected one of 'faq', 'assignment', 'lecture'")
        })
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_key_or_default(&s))
    }
}

impl Serialize for Mode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.key())
    }
}

/// Tone the assistant takes with students.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TeachingStyle {
    /// Warm and encouraging (default).
    #[default]
    Supportive,
    /// Guides with questions instead of answers.
    Socratic,
    /// Brief and direct.
    Concise,
}

impl TeachingStyle {
    /// Every style, in display order.
    pub const ALL: [Self; 3] = [Self::Supportive, Self::Socratic, Self::Concise];

    /// Stable key used in config files and the API.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Supportive => "supportive",
            Self::Socratic => "socratic",
            Self::Concise => "concise",
        }
    }

    /// Parses a style key, case-insensitively.
    #[must_use]
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "supportive" => Some(Self::Supportive),
            "socratic" => Some(Self::Socratic),
            "concise" => Some(Self::Concise),
            _ => None,
        }
    }

    /// Parses a style key, falling back to [`TeachingStyle::Supportive`]
    /// with a warning.
    #[must_use]
    pub fn from_key_or_default(s: &str) -> Self {
        Self::from_key(s).unwrap_or_else(|| {
            warn!(value = %s, "Unknown teaching style, falling back to supportive");
            Self::default()
        })
    }
}

impl std::fmt::Display for TeachingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for TeachingStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| {
            format!(
                "invalid teaching style '{s}': expected one of 'supportive', 'socratic', 'concise'"
            )
        })
    }
}

impl<'de> Deserialize<'de> for TeachingStyle {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_key_or_default(&s))
    }
}

impl Serialize for TeachingStyle {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.key())
    }
}
