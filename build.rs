use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directories whose TOML files are embedded, with the constant they fill.
const COLLECTIONS: &[(&str, &str)] = &[
    ("presets", "BUILTIN_PRESETS"),
    ("strategies", "BUILTIN_STRATEGIES"),
];

fn main() {
    for (dir, _) in COLLECTIONS {
        println!("cargo:rerun-if-changed={}", dir);
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let dest_path = Path::new(&out_dir).join("registry.rs");
    let mut output = fs::File::create(&dest_path).expect("Failed to create registry.rs");

    writeln!(output, "// Auto-generated built-in registry from build.rs")
        .expect("Failed to write registry.rs");

    for (dir, constant) in COLLECTIONS {
        let files = toml_files(&Path::new(&manifest_dir).join(dir));
        writeln!(output).expect("Failed to write registry.rs");
        writeln!(output, "pub(crate) const {}: &[(&str, &str)] = &[", constant)
            .expect("Failed to write registry.rs");
        for path in files {
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            writeln!(
                output,
                "    ({:?}, include_str!({:?})),",
                file_name,
                path.display().to_string()
            )
            .expect("Failed to write registry.rs");
        }
        writeln!(output, "];").expect("Failed to write registry.rs");
    }
}

/// Sorted `.toml` files directly under `dir`; a missing directory is empty.
fn toml_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Warning: Failed to read directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.path()),
            Err(e) => {
                eprintln!("Warning: Failed to read entry: {}", e);
                None
            }
        })
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("toml"))
        .collect();
    files.sort();
    files
}
