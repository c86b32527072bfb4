//! Query tests for the `minimaws-db` data layer.
//!
//! Each test opens a fresh in-memory database, applies the migrations and
//! loads `fixtures/sample.sql`, so no external database is required.

// Panicking on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use minimaws_db::DatabasePool;
use minimaws_types::{MachineId, SourceFileId};

const SAMPLE: &str = include_str!("fixtures/sample.sql");

async fn sample_db() -> DatabasePool {
    let db = DatabasePool::open_in_memory()
        .await
        .expect("Failed to open in-memory database");
    sqlx::raw_sql(SAMPLE)
        .execute(db.pool())
        .await
        .expect("Failed to load fixture data");
    db
}

// =============================================================================
// Machine queries
// =============================================================================

#[tokio::test]
async fn machine_info_for_clone() {
    let db = sample_db().await;
    let info = db.machines().machine_info("pacman").await.unwrap().unwrap();

    assert_eq!(info.id, MachineId(1));
    assert_eq!(info.description, "Pac-Man (Midway)");
    assert_eq!(info.sourcefile, "pacman/pacman.cpp");
    assert!(!info.isdevice);
    assert!(info.runnable);
    assert_eq!(info.year.as_deref(), Some("1980"));
    assert_eq!(info.manufacturer.as_deref(), Some("Namco (Midway license)"));
    assert_eq!(info.cloneof.as_deref(), Some("puckman"));
    assert_eq!(info.romof.as_deref(), Some("puckman"));
}

#[tokio::test]
async fn machine_info_for_device_has_no_system_fields() {
    let db = sample_db().await;
    let info = db.machines().machine_info("z80ctc").await.unwrap().unwrap();

    assert!(info.isdevice);
    assert!(!info.runnable);
    assert_eq!(info.year, None);
    assert_eq!(info.manufacturer, None);
    assert_eq!(info.cloneof, None);
}

#[tokio::test]
async fn machine_info_unknown_is_none() {
    let db = sample_db().await;
    assert!(db.machines().machine_info("nosuch").await.unwrap().is_none());
}

#[tokio::test]
async fn description_lookup() {
    let db = sample_db().await;
    let machines = db.machines();
    assert_eq!(
        machines.description("puckman").await.unwrap().as_deref(),
        Some("Puck Man (Japan set 1)")
    );
    assert_eq!(machines.description("neogeo").await.unwrap(), None);
}

#[tokio::test]
async fn devices_referenced_includes_unknown_devices() {
    let db = sample_db().await;
    let refs = db.machines().devices_referenced(MachineId(1)).await.unwrap();

    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].shortname, "namco_audio");
    assert_eq!(refs[0].description, None);
    assert_eq!(refs[0].sourcefile, None);
    assert_eq!(refs[1].shortname, "z80ctc");
    assert_eq!(refs[1].description.as_deref(), Some("Z80 CTC"));
    assert_eq!(refs[1].sourcefile.as_deref(), Some("machine/z80ctc.cpp"));
}

#[tokio::test]
async fn device_references_lists_referencing_machines() {
    let db = sample_db().await;
    let refs = db.machines().device_references("z80ctc").await.unwrap();

    let names: Vec<&str> = refs.iter().map(|r| r.shortname.as_str()).collect();
    assert_eq!(names, ["pacman", "puckman"]);
    assert!(refs.iter().all(|r| r.sourcefile.as_deref() == Some("pacman/pacman.cpp")));
}

// =============================================================================
// Source file queries
// =============================================================================

#[tokio::test]
async fn sourcefile_id_exact_match_only() {
    let db = sample_db().await;
    let store = db.sourcefiles();
    assert_eq!(
        store.sourcefile_id("pacman/pacman.cpp").await.unwrap(),
        Some(SourceFileId(1))
    );
    assert_eq!(store.sourcefile_id("pacman").await.unwrap(), None);
    assert_eq!(store.sourcefile_id("pacman/*").await.unwrap(), None);
}

#[tokio::test]
async fn count_sourcefiles_uses_glob() {
    let db = sample_db().await;
    let store = db.sourcefiles();
    assert_eq!(store.count_sourcefiles("pacman/*").await.unwrap(), 2);
    assert_eq!(store.count_sourcefiles("*").await.unwrap(), 5);
    assert_eq!(store.count_sourcefiles("atari/*").await.unwrap(), 0);
}

#[tokio::test]
async fn sourcefiles_listing_counts_machines() {
    let db = sample_db().await;
    let all = db.sourcefiles().sourcefiles(None).await.unwrap();

    assert_eq!(all.len(), 5);
    let pacman = all.iter().find(|s| s.filename == "pacman/pacman.cpp").unwrap();
    assert_eq!(pacman.machines, 3);
    let empty = all.iter().find(|s| s.filename == "pacman/empty.cpp").unwrap();
    assert_eq!(empty.machines, 0);
}

#[tokio::test]
async fn sourcefiles_listing_filtered() {
    let db = sample_db().await;
    let filtered = db.sourcefiles().sourcefiles(Some("pacman/*")).await.unwrap();

    let names: Vec<&str> = filtered.iter().map(|s| s.filename.as_str()).collect();
    assert_eq!(names, ["pacman/empty.cpp", "pacman/pacman.cpp"]);
}

#[tokio::test]
async fn sourcefile_machines_in_name_order() {
    let db = sample_db().await;
    let machines = db.sourcefiles().sourcefile_machines(SourceFileId(1)).await.unwrap();

    let names: Vec<&str> = machines.iter().map(|m| m.shortname.as_str()).collect();
    assert_eq!(names, ["pacman", "pacmanf", "puckman"]);
    assert_eq!(machines[0].cloneof.as_deref(), Some("puckman"));
    assert_eq!(machines[2].cloneof, None);
}

// =============================================================================
// Listing queries
// =============================================================================

#[tokio::test]
async fn full_names_by_pattern() {
    let db = sample_db().await;
    let rows = db.listings().full_names("pac*").await.unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.shortname.as_str()).collect();
    assert_eq!(names, ["pacman", "pacmanf"]);
}

#[tokio::test]
async fn sources_by_pattern() {
    let db = sample_db().await;
    let rows = db.listings().sources("gal*").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sourcefile, "namco/galaxian.cpp");
}

#[tokio::test]
async fn clones_match_on_parent() {
    let db = sample_db().await;
    let rows = db.listings().clones("puckman").await.unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.shortname.as_str()).collect();
    assert_eq!(names, ["pacman", "pacmanf"]);
    assert!(rows.iter().all(|r| r.parent == "puckman"));
}

#[tokio::test]
async fn brothers_share_source_file() {
    let db = sample_db().await;
    let rows = db.listings().brothers("pacmanf").await.unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.shortname.as_str()).collect();
    assert_eq!(names, ["pacman", "pacmanf", "puckman"]);
    assert_eq!(rows[2].parent, None);
}
