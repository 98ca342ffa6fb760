use std::process;

use serde::Serialize;

use lipi::{Lipi, ScriptEngine, TypingContextSettings, TypingDiff};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Serialize)]
pub struct TypingStep {
    pub key: String,
    #[serde(flatten)]
    pub diff: TypingDiff,
    /// Buffer contents after applying the diff.
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct TypingReport {
    pub script: String,
    pub output: String,
    pub steps: Vec<TypingStep>,
}

/// Type `keys` one char at a time into `script`.
pub fn type_cmd(
    keys: &str,
    script: &str,
    native_numerals: Option<bool>,
    inherent_vowel: Option<bool>,
    steps: bool,
    json: bool,
) {
    let mut settings = TypingContextSettings::default();
    if let Some(enabled) = native_numerals {
        settings = settings.with_use_native_numerals(enabled);
    }
    if let Some(enabled) = inherent_vowel {
        settings = settings.with_include_inherent_vowel(enabled);
    }
    let report = die!(run_keys(keys, script, settings), "Error: {}");

    if json {
        println!("{}", die!(serde_json::to_string_pretty(&report), "Error: {}"));
        return;
    }
    if steps {
        for step in &report.steps {
            println!(
                "{:<4} -{} +{:<8} {}",
                step.key, step.diff.delete_count, step.diff.insert_text, step.output
            );
        }
    }
    println!("{}", report.output);
}

/// Feed keys without pauses, so the context never times out.
pub fn run_keys(
    keys: &str,
    script: &str,
    settings: TypingContextSettings,
) -> lipi::Result<TypingReport> {
    let mut ctx = Lipi::new().create_typing_context(script, Some(settings))?;
    let mut output = String::new();
    let mut steps = Vec::new();
    for ch in keys.chars() {
        let key = ch.to_string();
        let diff = ctx.take_key_input(&key);
        diff.apply(&mut output);
        steps.push(TypingStep {
            key,
            diff,
            output: output.clone(),
        });
    }
    Ok(TypingReport {
        script: ctx.script_name().to_string(),
        output,
        steps,
    })
}
