//! Catalog-wide status reports for one pipeline stage.
//!
//! The report walks every season in order, derives each episode's status
//! for the stage and keeps the rows that pass the filter. Rendering is left
//! to the caller.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{AssetStatus, AssetType, Catalog, CatalogError};

#[derive(Debug, Error)]
pub enum StatusError {
    /// The filter names a status the stage can never be in.
    #[error("The '{filter}' filter is only available for recognitions, not for {asset_type}")]
    InvalidFilter {
        asset_type: AssetType,
        filter: AssetStatus,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// One episode line of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub season: u32,
    pub episode: u32,
    pub title: String,
    pub status: AssetStatus,
}

/// Result of a status walk.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub asset_type: AssetType,
    pub filter: AssetStatus,
    pub rows: Vec<StatusRow>,
    pub total: usize,
}

impl StatusReport {
    /// Number of rows per status.
    pub fn count_by_status(&self) -> HashMap<AssetStatus, usize> {
        let mut counts = HashMap::new();
        for row in &self.rows {
            *counts.entry(row.status).or_insert(0) += 1;
        }
        counts
    }
}

/// Builds the status report of `asset_type` across the whole catalog.
///
/// `in_flight` maps episode names (vendor job tokens) to statuses observed at
/// the vendor; they override filesystem derivation for matching episodes
/// and only apply to stages that have a remote in-process state.
pub fn investigate(
    catalog: &Catalog,
    asset_type: AssetType,
    filter: AssetStatus,
    in_flight: &HashMap<String, AssetStatus>,
) -> Result<StatusReport, StatusError> {
    if filter == AssetStatus::InProcess && !asset_type.supports_in_process() {
        return Err(StatusError::InvalidFilter { asset_type, filter });
    }

    let mut rows = Vec::new();
    for number in catalog.season_numbers() {
        let mut season = catalog.load_season(number)?;

        for episode in season.episodes_mut() {
            if asset_type.supports_in_process() {
                if let Some(status) = in_flight.get(&episode.name()) {
                    episode.set_asset_status(asset_type, *status)?;
                }
            }

            let status = episode.asset_status(asset_type);
            if !filter.matches(status) {
                continue;
            }

            rows.push(StatusRow {
                season: episode.season(),
                episode: episode.number(),
                title: episode.display_title(),
                status,
            });
        }
    }

    let total = rows.len();
    debug!(%asset_type, %filter, total, "Status report built");

    Ok(StatusReport {
        asset_type,
        filter,
        rows,
        total,
    })
}
