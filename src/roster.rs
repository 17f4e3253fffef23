//! Client roster: the records reconciled against report files, plus JSON
//! load/save so a roster exported from the spreadsheet can be fed in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{ReportcheckError, Result};
use crate::insurer::Insurer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub ico: String,
    /// Insurers the client must report to. Empty means any one report suffices.
    #[serde(default)]
    pub required_insurers: BTreeSet<Insurer>,
    #[serde(default)]
    pub report_generated: bool,
}

impl Client {
    pub fn new(name: impl Into<String>, ico: impl Into<String>, required_insurers: BTreeSet<Insurer>) -> Self {
        Self {
            name: name.into(),
            ico: ico.into(),
            required_insurers,
            report_generated: false,
        }
    }
}

pub fn load_roster(path: &Path) -> Result<Vec<Client>> {
    let content = std::fs::read_to_string(path).map_err(ReportcheckError::Io)?;
    let clients: Vec<Client> = serde_json::from_str(&content)?;
    log::info!("Loaded {} clients from {}", clients.len(), path.display());
    Ok(clients)
}

pub fn save_roster(path: &Path, clients: &[Client]) -> Result<()> {
    let json = serde_json::to_string_pretty(clients)?;
    std::fs::write(path, json).map_err(ReportcheckError::Io)?;
    Ok(())
}
