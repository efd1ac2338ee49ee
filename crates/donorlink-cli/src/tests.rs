use super::*;
use crate::resolve::{PendingSummary, RecordOutcome};

#[test]
fn parses_migrate_command() {
    let cli = Cli::try_parse_from(["donorlink-cli", "migrate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Migrate)));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["donorlink-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_resolve_with_id() {
    let id = Uuid::new_v4();
    let cli = Cli::try_parse_from(["donorlink-cli", "resolve", &id.to_string()])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Resolve { id: parsed }) if parsed == id
    ));
}

#[test]
fn resolve_rejects_malformed_id() {
    assert!(Cli::try_parse_from(["donorlink-cli", "resolve", "42"]).is_err());
}

#[test]
fn resolve_pending_defaults() {
    let cli = Cli::try_parse_from(["donorlink-cli", "resolve-pending"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::ResolvePending {
            limit: 100,
            concurrency: None,
            dry_run: false
        })
    ));
}

#[test]
fn resolve_pending_with_flags() {
    let cli = Cli::try_parse_from([
        "donorlink-cli",
        "resolve-pending",
        "--limit",
        "5",
        "--concurrency",
        "4",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::ResolvePending {
            limit: 5,
            concurrency: Some(4),
            dry_run: true
        })
    ));
}

#[test]
fn pending_summary_counts_each_outcome() {
    let outcomes = vec![
        RecordOutcome::Resolved {
            id: Uuid::new_v4(),
            location: "MG Road".to_string(),
        },
        RecordOutcome::Resolved {
            id: Uuid::new_v4(),
            location: "Camp, Pune".to_string(),
        },
        RecordOutcome::Skipped {
            id: Uuid::new_v4(),
            reason: "no coordinates available".to_string(),
        },
        RecordOutcome::Failed {
            id: Uuid::new_v4(),
            error: "reverse geocoding failed".to_string(),
        },
    ];

    assert_eq!(
        PendingSummary::from_outcomes(&outcomes),
        PendingSummary {
            resolved: 2,
            skipped: 1,
            failed: 1
        }
    );
}

#[test]
fn record_outcome_display_includes_id_and_detail() {
    let id = Uuid::new_v4();
    let line = RecordOutcome::Resolved {
        id,
        location: "MG Road".to_string(),
    }
    .to_string();
    assert!(line.starts_with(&id.to_string()));
    assert!(line.ends_with("MG Road"));
}
