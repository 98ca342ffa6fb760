use std::path::Path;

use clap::{Parser, Subcommand};

use lipi_cli::commands::{config_ops, convert_ops, script_ops, typing_ops};

#[derive(Parser)]
#[command(name = "lipitool", about = "Lipi transliteration and typing tool")]
struct Cli {
    /// Settings TOML file to use instead of the built-in defaults
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Directory for JSON trace output (requires --features trace)
    #[arg(long, global = true)]
    trace_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transliterate text between scripts
    Convert {
        /// Source script
        #[arg(long)]
        from: String,
        /// Target script
        #[arg(long)]
        to: String,
        /// Option to enable, as NAME or NAME=true|false (repeatable)
        #[arg(long = "opt")]
        opts: Vec<String>,
        /// Text to convert (reads stdin when omitted)
        text: Option<String>,
    },
    /// List the options that apply to a script pair
    Options {
        /// Source script
        from: String,
        /// Target script
        to: String,
    },
    /// Resolve a script name, language or alias
    Normalize {
        /// Name to resolve
        name: String,
    },
    /// List known scripts
    Scripts {
        /// List language names and the script each resolves to
        #[arg(long)]
        languages: bool,
        /// Print scripts, languages and aliases as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a script's krama table
    Krama {
        /// Script name
        script: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which keys type which glyphs
    TypingMap {
        /// Script name
        script: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Simulate typing keys into a script
    Type {
        /// Target script
        #[arg(long)]
        script: String,
        /// Override the native numerals setting
        #[arg(long)]
        native_numerals: Option<bool>,
        /// Override the inherent vowel setting
        #[arg(long)]
        inherent_vowel: Option<bool>,
        /// Print the diff produced by every key
        #[arg(long)]
        steps: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Keys to type
        keys: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Some(dir) = &cli.trace_dir {
        if !lipi::trace_init::init_tracing(Path::new(dir)) {
            eprintln!("Warning: tracing not installed (build with --features trace)");
        }
    }
    if let Some(file) = &cli.settings {
        config_ops::load_settings(file);
    }

    match cli.command {
        Command::Convert {
            from,
            to,
            opts,
            text,
        } => convert_ops::convert_cmd(text.as_deref(), &from, &to, &opts),
        Command::Options { from, to } => convert_ops::options_cmd(&from, &to),
        Command::Normalize { name } => script_ops::normalize_cmd(&name),
        Command::Scripts { languages, json } => script_ops::scripts_cmd(languages, json),
        Command::Krama { script, json } => script_ops::krama_cmd(&script, json),
        Command::TypingMap { script, json } => script_ops::typing_map_cmd(&script, json),
        Command::Type {
            script,
            native_numerals,
            inherent_vowel,
            steps,
            json,
            keys,
        } => typing_ops::type_cmd(&keys, &script, native_numerals, inherent_vowel, steps, json),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
