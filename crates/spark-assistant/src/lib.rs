//! Spark Teaching Assistant Core
//!
//! Resolves course materials per teaching mode, packs them into a bounded
//! context block, composes the system prompt, and exposes the configuration
//! over HTTP.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod materials;
pub mod mode;
pub mod prompt;
pub mod store;

pub use api::{
    create_router, AppState, ConfigResponse, ConfigSummary, ErrorResponse, ModeInfo,
    ReloadResponse, UpdateConfigResponse,
};
pub use config::{Config, ConfigUpdate, LlmParams, LlmParamsUpdate};
pub use context::{assemble, teaching_context, MAX_CONTEXT_CHARS, TRUNCATION_MARKER};
pub use error::{Result, SparkError};
pub use materials::{resolve, summary, MaterialsSummary, ModeMaterials};
pub use mode::{Mode, TeachingStyle};
pub use prompt::{compose, compose_with_context, ChatMessage, ConversationLog, Role};
pub use store::ConfigStore;
