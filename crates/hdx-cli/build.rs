//! Sets `HDX_VERSION` for `hdx --version`.
//!
//! Inside a git checkout this is `git describe --tags --always --dirty` with
//! any leading `v` removed. Source tarballs fall back to the package version.

use std::process::Command;

fn main() {
    for path in [".git/HEAD", ".git/refs/", ".git/index"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let version = describe().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_owned());
    println!("cargo:rustc-env=HDX_VERSION={version}");
}

fn describe() -> Option<String> {
    Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().trim_start_matches('v').to_owned())
        .filter(|s| !s.is_empty())
}
