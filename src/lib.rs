//! Transliteration between Indic scripts and real-time typing into them.
//!
//! [`Lipi`] implements [`ScriptEngine`], the whole-text surface: conversion,
//! option discovery, script data and typing contexts. [`TypingContext`]
//! turns single keys into [`TypingDiff`]s for an editor buffer.

mod config;
mod engine;
pub mod trace_init;

pub use config::{settings_default_config, settings_load_config, ConfigError};
pub use engine::{Lipi, ScriptEngine};

pub use lipi_core::diff::{compute_diff, TypingDiff};
pub use lipi_core::engine::RenderOptions;
pub use lipi_core::inventory::{ScriptTypingDataMap, TypingDataMapItem};
pub use lipi_core::krama::{Category, KramaModel};
pub use lipi_core::settings;
pub use lipi_core::options::{TransliterationOptions, PRESERVE_SPECIFIC_CHARS, USE_TYPING_CHARS};
pub use lipi_core::script::{ScriptKind, NORMAL};
pub use lipi_core::{LipiError, Result, ScriptDefinition, ScriptListData, ScriptRegistry};
pub use lipi_typing::{
    emulate_typing, TypingContext, TypingContextSettings, DEFAULT_AUTO_CONTEXT_CLEAR_TIME_MS,
    DEFAULT_INCLUDE_INHERENT_VOWEL, DEFAULT_USE_NATIVE_NUMERALS,
};

pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
