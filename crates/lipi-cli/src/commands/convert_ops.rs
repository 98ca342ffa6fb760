use std::io::{self, Write};
use std::process;

use lipi::{Lipi, ScriptEngine, TransliterationOptions};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionArgError {
    #[error("expected NAME or NAME=true|false, got `{0}`")]
    Malformed(String),
}

/// Parse repeated `--opt NAME[=BOOL]` arguments.
pub fn parse_options(args: &[String]) -> Result<TransliterationOptions, OptionArgError> {
    let mut options = TransliterationOptions::new();
    for arg in args {
        let (name, value) = match arg.split_once('=') {
            Some((name, "true")) => (name, true),
            Some((name, "false")) => (name, false),
            Some(_) => return Err(OptionArgError::Malformed(arg.clone())),
            None => (arg.as_str(), true),
        };
        if name.is_empty() {
            return Err(OptionArgError::Malformed(arg.clone()));
        }
        options.insert(name.to_string(), value);
    }
    Ok(options)
}

/// Transliterate `text`, or all of stdin when it is `None`.
pub fn convert_cmd(text: Option<&str>, from: &str, to: &str, opts: &[String]) {
    let options = die!(parse_options(opts), "Error: {}");
    let input = match text {
        Some(t) => t.to_string(),
        None => die!(io::read_to_string(io::stdin()), "Error reading stdin: {}"),
    };
    let out = die!(
        Lipi::new().transliterate(&input, from, to, Some(&options)),
        "Error: {}"
    );
    let mut stdout = io::stdout().lock();
    die!(stdout.write_all(out.as_bytes()), "Error writing output: {}");
    if text.is_some() {
        die!(writeln!(stdout), "Error writing output: {}");
    }
}

pub fn options_cmd(from: &str, to: &str) {
    let names = die!(Lipi::new().get_all_options(from, to), "Error: {}");
    if names.is_empty() {
        println!("(no options)");
    }
    for name in names {
        println!("{name}");
    }
}
