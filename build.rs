//! Build script for bumplist.
//!
//! Copies the `.env.example` configuration template into the user's bumplist
//! configuration directory, next to where the application looks for `.env`
//! and stores its session file.
//!
//! - Linux: `~/.config/bumplist/.env.example`
//! - macOS: `~/Library/Application Support/bumplist/.env.example`
//! - Windows: `%APPDATA%/bumplist/.env.example`
//!
//! A missing template or an unwritable configuration directory only produces
//! a cargo warning; the build itself never depends on it.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("bumplist");

    let copied = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")));
    if let Err(e) = copied {
        println!(
            "cargo:warning=could not copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
