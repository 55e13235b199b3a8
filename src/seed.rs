//! Out-of-band provisioning of the curated directory.
//!
//! The API never creates professionals or resources, so deployments load
//! them from a JSON file at startup:
//!
//! ```json
//! { "professionals": [ ... ], "resources": [ ... ] }
//! ```
//!
//! Every record must carry its own `id`; loading the same file twice is a
//! no-op.

use anyhow::Context;
use serde::Deserialize;

use crate::db::Store;
use crate::models::professional::Professional;
use crate::models::resource::Resource;
use crate::validation::check;

#[derive(Debug, Default, Deserialize)]
pub struct DirectorySeed {
    #[serde(default)]
    pub professionals: Vec<Professional>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub professionals: usize,
    pub resources: usize,
}

impl DirectorySeed {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let seed: DirectorySeed =
            serde_json::from_str(raw).context("Directory seed could not be parsed")?;

        for p in &seed.professionals {
            check(p).map_err(|v| {
                anyhow::anyhow!("Invalid professional {} ({}): {:?}", p.id, p.name, v)
            })?;
        }
        for r in &seed.resources {
            check(r)
                .map_err(|v| anyhow::anyhow!("Invalid resource {} ({}): {:?}", r.id, r.title, v))?;
        }

        Ok(seed)
    }

    pub async fn apply(&self, store: &Store) -> anyhow::Result<SeedReport> {
        for p in &self.professionals {
            store.professionals.insert(p).await?;
        }
        for r in &self.resources {
            store.resources.insert(r).await?;
        }
        Ok(SeedReport {
            professionals: self.professionals.len(),
            resources: self.resources.len(),
        })
    }
}

pub async fn load_file(path: &str, store: &Store) -> anyhow::Result<SeedReport> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read directory seed {}", path))?;
    let report = DirectorySeed::parse(&raw)?.apply(store).await?;

    tracing::info!(
        path = %path,
        professionals = report.professionals,
        resources = report.resources,
        "Directory seed applied"
    );
    Ok(report)
}
