//! Shared fixtures for quill-core integration tests.
//!
//! [`install_fake_engine`] writes a small shell script that follows the
//! engine's disk layout and output phrases closely enough to drive every
//! workflow. Two repository names trigger special behaviour:
//!
//! - `Slow`: records its PID in `slow.pid` and sleeps for 30 s
//! - `Mute`: exits non-zero without printing anything

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use quill_core::{EngineAdapter, QuillClient, SnapshotResolver};
use tempfile::TempDir;

pub const FAKE_ENGINE: &str = r#"#!/bin/sh
op="$1"; repo="$2"; file="$3"; extra="$4"

if [ "$repo" = "Slow" ]; then
    echo $$ > slow.pid
    exec sleep 30
fi
if [ "$repo" = "Mute" ]; then
    exit 1
fi

case "$op" in
init)
    mkdir -p "$repo/commits" && : > "$repo/config.txt"
    echo "Created: $repo"
    echo "Initialized empty VCS repository in $repo"
    ;;
add)
    if [ ! -f "$file" ]; then
        echo "File not found: $file" >&2
        exit 1
    fi
    cp "$file" "$repo/$file"
    echo "File $file added to repository $repo"
    ;;
commit)
    [ -f "$file" ] && cp "$file" "$repo/$file"
    if [ ! -f "$repo/$file" ]; then
        echo "File not tracked: $file" >&2
        exit 1
    fi
    n=$(ls "$repo/commits" | grep -c "^$file\.[0-9]*$")
    tag=$(printf '20240101%06d' $((n + 1)))
    cp "$repo/$file" "$repo/commits/$file.$tag"
    [ -n "$extra" ] && printf '%s\n' "$extra" > "$repo/commits/$file.$tag.msg"
    echo "File $file committed as version $tag"
    ;;
revert)
    if [ ! -f "$repo/commits/$file.$extra" ]; then
        echo "Version not found: $extra" >&2
        exit 1
    fi
    cp "$repo/commits/$file.$extra" "$repo/$file"
    echo "File $file reverted to version $extra"
    ;;
checkout)
    cp "$repo/$file" "$file.decrypted"
    echo "File $file checked out to $file.decrypted"
    ;;
status)
    echo "Repository: $repo"
    ls "$repo" | grep -v '^commits$' | grep -v '^config.txt$'
    ;;
log)
    if [ -n "$file" ]; then
        ls "$repo/commits" | grep "^$file\." | grep -v '\.msg$'
    else
        ls "$repo/commits" | grep -v '\.msg$'
    fi
    ;;
*)
    echo "Unknown command: $op" >&2
    exit 2
    ;;
esac
"#;

/// Write the fake engine into `dir` and make it executable.
pub fn install_fake_engine(dir: &Path) -> PathBuf {
    let path = dir.join("myvcs");
    fs::write(&path, FAKE_ENGINE).unwrap();
    set_executable(&path);
    path
}

#[cfg(unix)]
fn set_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) {}

/// Temp root with the fake engine installed, plus a client bound to it.
pub fn fake_client(timeout: Duration) -> (TempDir, QuillClient) {
    let temp = TempDir::new().unwrap();
    let engine = install_fake_engine(temp.path());
    let client = QuillClient::new(
        SnapshotResolver::new(temp.path(), vec!["myvcs".to_string()]),
        EngineAdapter::new(engine, temp.path(), timeout),
    );
    (temp, client)
}
