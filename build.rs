use std::collections::BTreeMap;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LOCALE: &str = "en-US";

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let locales_dir = manifest_dir.join("locales");
    println!("cargo:rerun-if-changed={}", locales_dir.display());

    let mut locales = BTreeMap::new();
    if let Ok(entries) = fs::read_dir(&locales_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            println!("cargo:rerun-if-changed={}", path.display());
            locales.insert(locale.to_string(), load_locale(&path));
        }
    }

    let mut generated = String::new();
    let _ = writeln!(generated, "pub const DEFAULT_LOCALE: &str = {DEFAULT_LOCALE:?};");
    let _ = writeln!(
        generated,
        "pub static LOCALES: &[(&str, &[(&str, &str)])] = &["
    );
    for (locale, entries) in &locales {
        let _ = writeln!(generated, "    ({locale:?}, &[");
        for (key, value) in entries {
            let _ = writeln!(generated, "        ({key:?}, {value:?}),");
        }
        let _ = writeln!(generated, "    ]),");
    }
    let _ = writeln!(generated, "];");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap_or_default());
    let target = out_dir.join("loginkit_i18n_generated.rs");
    if let Err(error) = fs::write(&target, generated) {
        panic!("failed to write {}: {error}", target.display());
    }
}

fn load_locale(path: &Path) -> BTreeMap<String, String> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|error| panic!("failed to read {}: {error}", path.display()));
    let table: toml::Table = toml::from_str(&content)
        .unwrap_or_else(|error| panic!("invalid locale file {}: {error}", path.display()));
    let mut entries = BTreeMap::new();
    flatten("", &table, &mut entries);
    entries
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            toml::Value::Table(nested) => flatten(&full_key, nested, out),
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}
