//! JSON seed data for the points model.

use std::{fs, path::Path};

use anyhow::Context;
use models::PointsModel;
use serde::{Deserialize, Serialize};
use shared::domain::{Destination, OfferGroup, Point};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    pub points: Vec<Point>,
    #[serde(default)]
    pub destinations: Vec<Destination>,
    #[serde(default)]
    pub offers: Vec<OfferGroup>,
}

impl SeedFile {
    pub fn into_model(self) -> PointsModel {
        PointsModel::new(self.points, self.destinations, self.offers)
    }
}

pub fn load_seed(path: &Path) -> anyhow::Result<SeedFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
    parse_seed(&raw).with_context(|| format!("failed to parse seed file '{}'", path.display()))
}

pub fn parse_seed(raw: &str) -> anyhow::Result<SeedFile> {
    let seed: SeedFile = serde_json::from_str(raw)?;
    if let Some(bad) = seed.points.iter().find(|p| !p.is_well_formed()) {
        anyhow::bail!("point {} ends before it starts", bad.id);
    }
    Ok(seed)
}
