use std::process;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use lipi::{Category, KramaModel, Lipi, ScriptEngine, ScriptListData};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Serialize)]
struct KramaRow<'a> {
    index: usize,
    key: &'a str,
    category: Category,
    text: &'a str,
}

pub fn normalize_cmd(name: &str) {
    let canonical = die!(Lipi::new().get_normalized_script_name(name), "Error: {}");
    println!("{canonical}");
}

/// List every known script with its schwa behavior, or the language names
/// that resolve to them.
pub fn scripts_cmd(languages: bool, json: bool) {
    let lipi = Lipi::new();
    if json {
        let data = lipi.get_script_list_data();
        println!("{}", die!(serde_json::to_string_pretty(&data), "Error: {}"));
        return;
    }
    if languages {
        for line in language_lines(&lipi.get_script_list_data()) {
            println!("{line}");
        }
        return;
    }
    let names = lipi.registry().known_scripts();
    let width = names.iter().map(|n| n.width()).max().unwrap_or(0);
    for name in names {
        let status = die!(lipi.get_schwa_status_for_script(name), "Error: {}");
        println!("{name:<width$}  {}", schwa_label(status));
    }
}

/// `language  script` lines in language-list order.
fn language_lines(data: &ScriptListData) -> Vec<String> {
    let mut langs: Vec<(&String, usize)> = data.langs.iter().map(|(l, i)| (l, *i)).collect();
    langs.sort_by_key(|(_, i)| *i);
    let width = langs.iter().map(|(l, _)| l.width()).max().unwrap_or(0);
    langs
        .into_iter()
        .filter_map(|(lang, _)| {
            let script = data.lang_script_map.get(lang)?;
            Some(format!("{lang:<width$}  {script}"))
        })
        .collect()
}

pub fn krama_cmd(name: &str, json: bool) {
    let data = die!(Lipi::new().get_script_krama_data(name), "Error: {}");
    let model = KramaModel::global();
    let rows: Vec<KramaRow<'_>> = data
        .iter()
        .enumerate()
        .map(|(index, (text, category))| KramaRow {
            index,
            key: &model.key(index).key,
            category: *category,
            text,
        })
        .collect();

    if json {
        println!("{}", die!(serde_json::to_string_pretty(&rows), "Error: {}"));
        return;
    }
    for line in krama_table(&rows) {
        println!("{line}");
    }
}

pub fn typing_map_cmd(name: &str, json: bool) {
    let map = die!(Lipi::new().get_script_typing_data_map(name), "Error: {}");
    if json {
        println!("{}", die!(serde_json::to_string_pretty(&map), "Error: {}"));
        return;
    }
    println!("# common");
    for item in &map.common_krama_map {
        println!("{}\t{}\t{}", item.text, item.category, item.mappings.join(" "));
    }
    if !map.script_specific_krama_map.is_empty() {
        println!("# script specific");
        for item in &map.script_specific_krama_map {
            println!("{}\t{}\t{}", item.text, item.category, item.mappings.join(" "));
        }
    }
}

fn schwa_label(status: Option<bool>) -> &'static str {
    match status {
        Some(true) => "brahmic, deletes schwa",
        Some(false) => "brahmic",
        None => "other",
    }
}

/// Rows aligned on display width, since glyphs and combining marks do not
/// occupy one column per char.
fn krama_table(rows: &[KramaRow<'_>]) -> Vec<String> {
    let key_width = rows.iter().map(|r| r.key.width()).max().unwrap_or(0);
    rows.iter()
        .map(|r| {
            format!(
                "{:>3}  {}{}  {:<8}  {}",
                r.index,
                r.key,
                " ".repeat(key_width - r.key.width()),
                r.category.as_str(),
                r.text
            )
        })
        .collect()
}
