use anyhow::{Context, Result, bail};
use ffimport_loader::Config;
use ffimport_loader::config::CONFIG_TEMPLATE;
use std::fs;
use std::path::{Path, PathBuf};

pub fn ffimport_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ffimport"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(ffimport_home()?.join("config.toml"))
}

fn resolve(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// Read and validate the config. Any missing or bad key fails here, before
/// the statement is touched.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = resolve(path)?;
    if !p.exists() {
        bail!("Config not found: {} (run: ffimport init)", p.display());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Config::from_toml_str(&s).with_context(|| format!("load {}", p.display()))
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = resolve(path)?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    if let Some(dir) = p.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::write(&p, CONFIG_TEMPLATE).with_context(|| format!("write {}", p.display()))?;
    println!("Wrote {} (set firefly.base_url and firefly.token)", p.display());
    Ok(())
}
