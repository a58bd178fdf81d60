use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=MENU_CATALOG_HINT");

    let hint = env::var("MENU_CATALOG_HINT").ok();

    if let Some(raw_hint) = hint {
        let candidate = PathBuf::from(raw_hint);
        let canonical = candidate.canonicalize().unwrap_or(candidate);

        println!("cargo:rustc-env=MENU_CATALOG_HINT={}", canonical.display());
    }
}
