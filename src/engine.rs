use tracing::debug_span;

use lipi_core::engine;
use lipi_core::inventory::{self, ScriptTypingDataMap};
use lipi_core::krama::Category;
use lipi_core::options::TransliterationOptions;
use lipi_core::script::normalize_script_name;
use lipi_core::{Result, ScriptListData, ScriptRegistry};
use lipi_typing::{TypingContext, TypingContextSettings};

/// The whole-text engine surface.
pub trait ScriptEngine {
    /// Convert `text` between scripts. `None` options means no options.
    fn transliterate(
        &self,
        text: &str,
        from: &str,
        to: &str,
        options: Option<&TransliterationOptions>,
    ) -> Result<String>;

    fn preload_script_data(&self, name: &str) -> Result<()>;

    /// `Some(deletes_schwa)` for Brahmic scripts, `None` for the others.
    fn get_schwa_status_for_script(&self, name: &str) -> Result<Option<bool>>;

    fn get_all_options(&self, from: &str, to: &str) -> Result<Vec<String>>;

    fn get_normalized_script_name(&self, name: &str) -> Result<String>;

    /// Language names accepted wherever a script name is.
    fn known_languages(&self) -> Vec<String>;

    fn get_script_list_data(&self) -> ScriptListData;

    fn get_script_krama_data(&self, name: &str) -> Result<Vec<(String, Category)>>;

    fn get_script_typing_data_map(&self, name: &str) -> Result<ScriptTypingDataMap>;

    fn create_typing_context(
        &self,
        name: &str,
        settings: Option<TypingContextSettings>,
    ) -> Result<TypingContext>;
}

/// [`ScriptEngine`] over a script registry, the process-wide one unless
/// given another.
#[derive(Clone, Copy)]
pub struct Lipi<'r> {
    registry: &'r ScriptRegistry,
}

impl Lipi<'static> {
    pub fn new() -> Self {
        Self {
            registry: ScriptRegistry::global(),
        }
    }
}

impl Default for Lipi<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Lipi<'r> {
    pub fn with_registry(registry: &'r ScriptRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r ScriptRegistry {
        self.registry
    }
}

impl ScriptEngine for Lipi<'_> {
    fn transliterate(
        &self,
        text: &str,
        from: &str,
        to: &str,
        options: Option<&TransliterationOptions>,
    ) -> Result<String> {
        match options {
            Some(options) => engine::transliterate(self.registry, text, from, to, options),
            None => engine::transliterate(
                self.registry,
                text,
                from,
                to,
                &TransliterationOptions::new(),
            ),
        }
    }

    fn preload_script_data(&self, name: &str) -> Result<()> {
        self.registry.preload(name)
    }

    fn get_schwa_status_for_script(&self, name: &str) -> Result<Option<bool>> {
        inventory::get_schwa_status_for_script(self.registry, name)
    }

    fn get_all_options(&self, from: &str, to: &str) -> Result<Vec<String>> {
        engine::get_all_options(self.registry, from, to)
    }

    fn get_normalized_script_name(&self, name: &str) -> Result<String> {
        normalize_script_name(name)
    }

    fn known_languages(&self) -> Vec<String> {
        self.registry
            .known_languages()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn get_script_list_data(&self) -> ScriptListData {
        self.registry.script_list_data()
    }

    fn get_script_krama_data(&self, name: &str) -> Result<Vec<(String, Category)>> {
        inventory::get_script_krama_data(self.registry, name)
    }

    fn get_script_typing_data_map(&self, name: &str) -> Result<ScriptTypingDataMap> {
        inventory::get_script_typing_data_map(self.registry, name)
    }

    fn create_typing_context(
        &self,
        name: &str,
        settings: Option<TypingContextSettings>,
    ) -> Result<TypingContext> {
        let _span = debug_span!("create_typing_context", script = name).entered();
        TypingContext::with_registry(self.registry, name, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipi_core::LipiError;

    #[test]
    fn transliterate_without_options() {
        let lipi = Lipi::new();
        assert_eq!(
            lipi.transliterate("namaste", "Normal", "Devanagari", None)
                .unwrap(),
            "नमस्ते"
        );
    }

    #[test]
    fn preload_fills_an_isolated_registry() {
        let registry = ScriptRegistry::new();
        let lipi = Lipi::with_registry(&registry);
        assert!(!registry.is_loaded("Gujarati"));
        lipi.preload_script_data("gu").unwrap();
        assert!(registry.is_loaded("Gujarati"));
        assert_eq!(
            lipi.preload_script_data("Klingon").unwrap_err(),
            LipiError::NotFound("Klingon".into())
        );
    }

    #[test]
    fn normalized_names() {
        let lipi = Lipi::new();
        assert_eq!(lipi.get_normalized_script_name("sanskrit").unwrap(), "Devanagari");
        assert_eq!(lipi.get_normalized_script_name("Devanagari").unwrap(), "Devanagari");
        assert!(lipi.get_normalized_script_name("").is_err());
    }

    #[test]
    fn language_listing() {
        let lipi = Lipi::new();
        let langs = lipi.known_languages();
        assert!(langs.iter().any(|l| l == "Punjabi"));
        let data = lipi.get_script_list_data();
        assert_eq!(data.lang_script_map["Punjabi"], "Gurumukhi");
        assert!(data.scripts.contains_key("Sinhala"));
        assert_eq!(data.script_alternates_map["dev"], "Devanagari");
    }

    #[test]
    fn works_as_trait_object() {
        let lipi = Lipi::new();
        let engine: &dyn ScriptEngine = &lipi;
        assert_eq!(engine.get_schwa_status_for_script("Odia").unwrap(), Some(true));
        assert!(engine
            .get_all_options("Devanagari", "Normal")
            .unwrap()
            .contains(&"all_to_normal:remove_virama_and_double_virama".to_string()));
        assert!(matches!(
            engine.get_script_krama_data("Normal"),
            Err(LipiError::UnsupportedScript(_))
        ));
        assert!(!engine
            .get_script_typing_data_map("Kannada")
            .unwrap()
            .common_krama_map
            .is_empty());
    }

    #[test]
    fn typing_context_from_engine() {
        let mut ctx = Lipi::new().create_typing_context("ta", None).unwrap();
        assert_eq!(ctx.script_name(), "Tamil");
        assert!(!ctx.take_key_input("k").is_noop());
        assert!(Lipi::new().create_typing_context("nope", None).is_err());
    }
}
