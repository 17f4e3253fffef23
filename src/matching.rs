//! Decide which clients have their reports for a target month.
//!
//! Only files in a folder that names their insurer count. Files are grouped
//! by ICO into the set of insurers that reported; a client is satisfied when
//! that set covers every required insurer, or is non-empty when nothing
//! specific is required.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::insurer::Insurer;
use crate::period::ReportPeriod;
use crate::roster::Client;
use crate::scan::ParsedFileName;

/// Per-client detail behind the `report_generated` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientStatus {
    pub client: Client,
    /// Insurers with a valid report for the client's ICO in the period
    pub available: BTreeSet<Insurer>,
    /// Required insurers not covered by `available`
    pub missing: BTreeSet<Insurer>,
}

/// Insurer sets per trimmed ICO for the target month.
pub fn available_insurers(
    parsed_files: &[ParsedFileName],
    target_year: i32,
    target_month: u32,
) -> HashMap<String, BTreeSet<Insurer>> {
    let mut by_ico: HashMap<String, BTreeSet<Insurer>> = HashMap::new();
    // No file can be dated in an impossible month
    let Ok(period) = ReportPeriod::new(target_year, target_month) else {
        return by_ico;
    };
    for file in parsed_files
        .iter()
        .filter(|f| !f.invalid_directory)
        .filter(|f| period.contains(f.report_date))
    {
        by_ico
            .entry(file.ico.trim().to_string())
            .or_default()
            .insert(file.insurer);
    }
    by_ico
}

fn is_satisfied(client: &Client, available: Option<&BTreeSet<Insurer>>) -> bool {
    match available {
        None => false,
        Some(set) if client.required_insurers.is_empty() => !set.is_empty(),
        Some(set) => set.is_superset(&client.required_insurers),
    }
}

/// Recompute `report_generated` for every client. Inputs are left untouched.
pub fn evaluate(
    clients: &[Client],
    parsed_files: &[ParsedFileName],
    target_year: i32,
    target_month: u32,
) -> Vec<Client> {
    let by_ico = available_insurers(parsed_files, target_year, target_month);
    clients
        .iter()
        .map(|client| Client {
            report_generated: is_satisfied(client, by_ico.get(client.ico.trim())),
            ..client.clone()
        })
        .collect()
}

/// Same evaluation as `evaluate`, keeping the insurer sets for reporting.
pub fn client_statuses(
    clients: &[Client],
    parsed_files: &[ParsedFileName],
    target_year: i32,
    target_month: u32,
) -> Vec<ClientStatus> {
    let by_ico = available_insurers(parsed_files, target_year, target_month);
    clients
        .iter()
        .map(|client| {
            let available = by_ico.get(client.ico.trim());
            let report_generated = is_satisfied(client, available);
            let available = available.cloned().unwrap_or_default();
            let missing = client
                .required_insurers
                .difference(&available)
                .copied()
                .collect();
            ClientStatus {
                client: Client {
                    report_generated,
                    ..client.clone()
                },
                available,
                missing,
            }
        })
        .collect()
}

/// Clients whose reports are not complete.
pub fn missing_clients(clients: &[Client]) -> Vec<&Client> {
    clients.iter().filter(|c| !c.report_generated).collect()
}
