//! Shared test utilities for quill-cli integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Minimal engine stand-in following the engine's disk layout and phrases.
const FAKE_ENGINE: &str = r#"#!/bin/sh
op="$1"; repo="$2"; file="$3"; extra="$4"
case "$op" in
init)
    mkdir -p "$repo/commits" && : > "$repo/config.txt"
    echo "Initialized empty VCS repository in $repo"
    ;;
add)
    [ -f "$file" ] || { echo "File not found: $file" >&2; exit 1; }
    cp "$file" "$repo/$file"
    echo "File $file added to repository $repo"
    ;;
commit)
    [ -f "$file" ] && cp "$file" "$repo/$file"
    n=$(ls "$repo/commits" | grep -c "^$file\.[0-9]*$")
    tag=$(printf '20240101%06d' $((n + 1)))
    cp "$repo/$file" "$repo/commits/$file.$tag"
    [ -n "$extra" ] && printf '%s\n' "$extra" > "$repo/commits/$file.$tag.msg"
    echo "File $file committed as version $tag"
    ;;
revert)
    [ -f "$repo/commits/$file.$extra" ] || { echo "Version not found: $extra" >&2; exit 1; }
    cp "$repo/commits/$file.$extra" "$repo/$file"
    echo "File $file reverted to version $extra"
    ;;
checkout)
    cp "$repo/$file" "$file.decrypted"
    echo "File $file checked out"
    ;;
status)
    echo "Repository: $repo"
    ;;
log)
    ls "$repo/commits" | grep -v '\.msg$'
    ;;
*)
    exit 2
    ;;
esac
"#;

/// Get a Command for the quill binary.
///
/// # Panics
///
/// Panics if the quill binary cannot be found.
#[allow(deprecated)]
pub fn quill_cmd() -> Command {
    Command::cargo_bin("quill").expect("quill binary should exist")
}

/// A temp root with the fake engine installed.
pub struct Sandbox {
    pub temp: TempDir,
    pub engine: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let engine = temp.path().join("myvcs");
        fs::write(&engine, FAKE_ENGINE).expect("write fake engine");
        set_executable(&engine);
        Self { temp, engine }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// `quill` bound to this sandbox, with no user config and no color.
    pub fn cmd(&self) -> Command {
        let mut cmd = quill_cmd();
        cmd.env_clear()
            .env("PATH", std::env::var_os("PATH").unwrap_or_default())
            .env("HOME", self.root())
            .env("QUILL_ROOT", self.root())
            .env("QUILL_ENGINE", &self.engine)
            .env("QUILL_COLOR", "never")
            .env("QUILL_QUIET", "true");
        cmd
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).expect("stat engine").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod engine");
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) {}
