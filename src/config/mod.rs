//! Configuration module for recap
//!
//! Handles loading settings from a TOML file with environment overrides.

mod settings;

pub use settings::{
    GeneralSettings, LlmSettings, ServerSettings, Settings, SummarizerSettings, TokenizerSettings,
};
