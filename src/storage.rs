use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::TRUST_STORE_FILE_NAME;

/// Sites the wallet has approved, persisted as YAML in the config directory
#[derive(Debug, Default)]
pub struct TrustStore {
    sites: BTreeSet<String>,
    path: PathBuf,
}

#[derive(Serialize, Deserialize, Default)]
struct TrustFile {
    #[serde(default)]
    trusted_sites: BTreeSet<String>,
}

impl TrustStore {
    /// Load `trusted_sites.yaml` from `config_dir`, starting empty if absent
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(TRUST_STORE_FILE_NAME);
        let sites = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_yaml::from_str::<TrustFile>(&content)
                .with_context(|| format!("parsing {}", path.display()))?
                .trusted_sites
        } else {
            BTreeSet::new()
        };

        Ok(TrustStore { sites, path })
    }

    /// In-memory store that never touches disk
    #[cfg(test)]
    pub fn ephemeral() -> Self {
        TrustStore::default()
    }

    pub fn is_trusted(&self, site: &str) -> bool {
        self.sites.contains(site)
    }

    /// Record `site` and persist. Returns false if it was already trusted.
    pub fn trust(&mut self, site: &str) -> Result<bool> {
        if !self.sites.insert(site.to_string()) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        self.ensure_dir()?;
        let content = serde_yaml::to_string(&TrustFile {
            trusted_sites: self.sites.clone(),
        })?;
        fs::write(&self.path, content)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
