use std::path::Path;
use std::process::Command;

/// Embeds `git describe` output (e.g. `a1b2c3d-dirty`) as FFIMPORT_BUILD_SHA.
fn main() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    println!(
        "cargo:rerun-if-changed={}",
        repo_root.join(".git").join("HEAD").display()
    );

    let describe = Command::new("git")
        .arg("-C")
        .arg(&repo_root)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output();

    let sha = match describe {
        Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout).trim().to_string(),
        _ => String::new(),
    };
    let sha = if sha.is_empty() { "unknown".to_string() } else { sha };

    println!("cargo:rustc-env=FFIMPORT_BUILD_SHA={sha}");
}
