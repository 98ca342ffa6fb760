pub mod diff;
pub mod engine;
mod error;
pub mod inventory;
pub mod krama;
pub mod options;
pub mod script;
pub mod settings;
mod trie;

pub use error::{LipiError, Result};
pub use options::TransliterationOptions;
pub use script::{ScriptDefinition, ScriptListData, ScriptRegistry};
