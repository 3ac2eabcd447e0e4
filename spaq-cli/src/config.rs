use std::fs;
use std::path::{Path, PathBuf};

use spaq_template::PrefixRegistry;

const SPAQ_DIR_ENV: &str = "SPAQ_DIR";
const SPAQ_DIR: &str = ".spaq";
const PREFIX_FILE: &str = "prefix";

/// The user's spaq directory: `$SPAQ_DIR` if set, else `~/.spaq/`.
fn spaq_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(SPAQ_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(SPAQ_DIR))
}

/// Build the prefix registry from the layered sources: the user prefix
/// file first, then each `--prefix` file in order, later files winning.
/// Missing or unreadable files are skipped, not failed.
pub fn load_prefixes(extra_files: &[PathBuf]) -> PrefixRegistry {
    let mut registry = PrefixRegistry::new();
    if let Some(dir) = spaq_dir() {
        merge_file(&mut registry, &dir.join(PREFIX_FILE));
    }
    for path in extra_files {
        merge_file(&mut registry, path);
    }
    registry
}

fn merge_file(registry: &mut PrefixRegistry, path: &Path) {
    if let Ok(text) = fs::read_to_string(path) {
        registry.load_source(&text);
    }
}
