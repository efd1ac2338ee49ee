//! Deferred resolution commands.
//!
//! `resolve` handles a single record; `resolve-pending` walks every record
//! that still renders as coordinates and retries the provider with bounded
//! concurrency. A failed record is reported and skipped; its stored location
//! is never touched.

use donorlink_db::DonationRequestRow;
use donorlink_geocode::{resolve_deferred, Geocoder, ResolveError};
use futures::stream::{self, StreamExt};
use uuid::Uuid;

/// Result of one record's resolution attempt.
#[derive(Debug)]
pub(crate) enum RecordOutcome {
    Resolved { id: Uuid, location: String },
    Skipped { id: Uuid, reason: String },
    Failed { id: Uuid, error: String },
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct PendingSummary {
    pub resolved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PendingSummary {
    pub(crate) fn from_outcomes(outcomes: &[RecordOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome {
                    RecordOutcome::Resolved { .. } => summary.resolved += 1,
                    RecordOutcome::Skipped { .. } => summary.skipped += 1,
                    RecordOutcome::Failed { .. } => summary.failed += 1,
                }
                summary
            })
    }
}

impl std::fmt::Display for RecordOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved { id, location } => write!(f, "{id}  resolved  {location}"),
            Self::Skipped { id, reason } => write!(f, "{id}  skipped   {reason}"),
            Self::Failed { id, error } => write!(f, "{id}  failed    {error}"),
        }
    }
}

/// Resolve one record and persist the result.
///
/// # Errors
///
/// Returns an error if the record does not exist, cannot be resolved, or
/// cannot be written back.
pub(crate) async fn run_resolve_one(
    pool: &sqlx::PgPool,
    geocoder: &dyn Geocoder,
    id: Uuid,
) -> anyhow::Result<()> {
    let row = match donorlink_db::get_donation_request(pool, id).await {
        Ok(row) => row,
        Err(donorlink_db::DbError::NotFound) => anyhow::bail!("donation request '{id}' not found"),
        Err(e) => return Err(e.into()),
    };

    match resolve_record(pool, geocoder, &row).await {
        outcome @ RecordOutcome::Resolved { .. } => {
            println!("{outcome}");
            Ok(())
        }
        RecordOutcome::Skipped { reason, .. } => anyhow::bail!("{id}: {reason}"),
        RecordOutcome::Failed { error, .. } => anyhow::bail!("{id}: {error}"),
    }
}

/// Resolve up to `limit` pending records, `concurrency` at a time.
///
/// # Errors
///
/// Returns an error only if the pending list cannot be loaded; per-record
/// failures are counted in the summary.
pub(crate) async fn run_resolve_pending(
    pool: &sqlx::PgPool,
    geocoder: &dyn Geocoder,
    limit: i64,
    concurrency: usize,
    dry_run: bool,
) -> anyhow::Result<()> {
    let rows = donorlink_db::list_pending_resolution(pool, limit).await?;

    if rows.is_empty() {
        println!("no donation requests awaiting resolution");
        return Ok(());
    }

    if dry_run {
        println!("[dry-run] {} request(s) would be resolved:", rows.len());
        for row in &rows {
            println!("  {}  {}", row.id, row.location().display());
        }
        return Ok(());
    }

    tracing::info!(count = rows.len(), concurrency, "resolving pending donation requests");

    let outcomes: Vec<RecordOutcome> = stream::iter(&rows)
        .map(|row| resolve_record(pool, geocoder, row))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    for outcome in &outcomes {
        println!("{outcome}");
    }

    let summary = PendingSummary::from_outcomes(&outcomes);
    println!(
        "resolved {}, skipped {}, failed {} of {}",
        summary.resolved,
        summary.skipped,
        summary.failed,
        outcomes.len()
    );
    Ok(())
}

async fn resolve_record(
    pool: &sqlx::PgPool,
    geocoder: &dyn Geocoder,
    row: &DonationRequestRow,
) -> RecordOutcome {
    let id = row.id;

    let location = match resolve_deferred(geocoder, &row.location()).await {
        Ok(location) => location,
        Err(e @ (ResolveError::NoCoordinatesAvailable | ResolveError::InvalidCoordinates { .. })) => {
            tracing::warn!(record_id = %id, error = %e, "record cannot be resolved");
            return RecordOutcome::Skipped {
                id,
                reason: e.to_string(),
            };
        }
        Err(e) => {
            tracing::warn!(record_id = %id, error = %e, "deferred resolution failed");
            return RecordOutcome::Failed {
                id,
                error: e.to_string(),
            };
        }
    };

    match donorlink_db::update_location(pool, id, &location).await {
        Ok(updated) => RecordOutcome::Resolved {
            id,
            location: updated.location().display(),
        },
        Err(e) => {
            tracing::error!(record_id = %id, error = %e, "failed to store resolved location");
            RecordOutcome::Failed {
                id,
                error: e.to_string(),
            }
        }
    }
}
