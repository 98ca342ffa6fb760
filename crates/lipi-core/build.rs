use std::fs;

fn main() {
    // Validate embedded TOML files at compile time.
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    validate_toml("data/krama.toml", include_str!("data/krama.toml"));
    validate_toml("data/scripts.toml", include_str!("data/scripts.toml"));
    validate_toml("data/options.toml", include_str!("data/options.toml"));

    let entries = fs::read_dir("data/scripts").expect("data/scripts must exist");
    for entry in entries {
        let path = entry.expect("readable data/scripts entry").path();
        let content = fs::read_to_string(&path).expect("readable script table");
        validate_toml(&path.display().to_string(), &content);
    }
    println!("cargo:rerun-if-changed=data");
    println!("cargo:rerun-if-changed=src/default_settings.toml");
}

fn validate_toml(path: &str, content: &str) {
    if content.parse::<toml::Value>().is_err() {
        panic!("{path} contains invalid TOML");
    }
}
