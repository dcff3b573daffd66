//! Ingestion into an in-memory SQLite store.

use assert_matches::assert_matches;
use config::IngestConfig;
use density::{DensityFilter, DensityRecord, DensityStore, SqliteDensityStore};
use ingest::workbook::load_sources;
use ingest::{
    ingest_sources, run_ingestion, AirQualityReading, BranchLocation, BranchType, IngestError,
    SourceTables,
};
use std::path::Path;

fn reading(tract: &str, pm25: Option<f64>) -> AirQualityReading {
    AirQualityReading {
        census_tract: tract.to_string(),
        pm25,
    }
}

fn branch(tract: &str, branch_type: BranchType) -> BranchLocation {
    BranchLocation {
        census_tract: tract.to_string(),
        branch_type,
    }
}

/// Config pointing at a workbook under `tests/fixtures`, default sheet layout.
fn fixture_config(name: &str) -> IngestConfig {
    IngestConfig {
        workbook: Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
            .display()
            .to_string(),
        ..IngestConfig::default()
    }
}

async fn stored(store: &SqliteDensityStore) -> Vec<DensityRecord> {
    let mut rows = store.query(&DensityFilter::new().build_query()).await.unwrap();
    rows.sort_by(|a, b| a.census_tract.cmp(&b.census_tract));
    rows
}

#[tokio::test]
async fn air_quality_defines_the_tract_universe() {
    let store = SqliteDensityStore::in_memory().await.unwrap();
    let sources = SourceTables {
        air_quality: vec![
            reading("17031010100", Some(12.4)),
            reading("17031010200", Some(7.9)),
        ],
        branches: vec![
            branch("17031010100", BranchType::Bank),
            branch("17031010100", BranchType::CreditUnion),
            branch("17031999999", BranchType::Bank),
        ],
    };

    let summary = ingest_sources(&sources, &store).await.unwrap();
    assert_eq!(summary.tracts_written, 2);
    assert_eq!(summary.dropped_branch_tracts, 1);

    assert_eq!(
        stored(&store).await,
        vec![
            DensityRecord::new("17031010100", 2, Some(12.4)),
            DensityRecord::new("17031010200", 0, Some(7.9)),
        ]
    );
}

#[tokio::test]
async fn reingest_replaces_previous_table() {
    let store = SqliteDensityStore::in_memory().await.unwrap();
    let first = SourceTables {
        air_quality: vec![reading("A", Some(1.0)), reading("B", Some(2.0))],
        branches: vec![],
    };
    let second = SourceTables {
        air_quality: vec![reading("C", None), reading("C", Some(4.0))],
        branches: vec![branch("C", BranchType::Bank)],
    };

    ingest_sources(&first, &store).await.unwrap();
    ingest_sources(&second, &store).await.unwrap();

    let rows = stored(&store).await;
    assert_eq!(rows, vec![DensityRecord::new("C", 1, Some(4.0))]);
    assert!(rows.iter().all(|r| r.branch_count >= 0));
}

#[tokio::test]
async fn missing_workbook_aborts_before_writing() {
    let store = SqliteDensityStore::in_memory().await.unwrap();
    ingest_sources(
        &SourceTables {
            air_quality: vec![reading("A", Some(1.0))],
            branches: vec![],
        },
        &store,
    )
    .await
    .unwrap();

    let config = IngestConfig {
        workbook: "does/not/exist.xlsx".to_string(),
        ..IngestConfig::default()
    };
    let result = run_ingestion(&config, &store).await;
    assert_matches!(result, Err(IngestError::WorkbookOpen { .. }));
    assert_eq!(store.count().await.unwrap(), 1);
}

#[test]
fn workbook_sheets_are_read_with_default_columns() {
    let sources = load_sources(&fixture_config("density_sources.xlsx")).unwrap();

    // numeric tract cells come back as floats and are normalised to text
    assert_eq!(
        sources.air_quality,
        vec![
            reading("17031010100", Some(12.4)),
            reading("17031010200", Some(7.9)),
            reading("17031010300", None),
        ]
    );
    assert_eq!(sources.branch_rows(BranchType::Bank), 3);
    // NCUA sheet spells the header "census tract"
    assert_eq!(
        sources
            .branches
            .iter()
            .filter(|b| b.branch_type == BranchType::CreditUnion)
            .cloned()
            .collect::<Vec<_>>(),
        vec![branch("17031010100", BranchType::CreditUnion)]
    );
}

#[tokio::test]
async fn workbook_ingestion_joins_on_air_quality_tracts() {
    let store = SqliteDensityStore::in_memory().await.unwrap();

    let summary = run_ingestion(&fixture_config("density_sources.xlsx"), &store)
        .await
        .unwrap();
    assert_eq!(summary.air_quality_rows, 3);
    assert_eq!(summary.bank_rows, 3);
    assert_eq!(summary.credit_union_rows, 1);
    assert_eq!(summary.tracts_written, 3);
    assert_eq!(summary.tracts_without_branches, 2);
    assert_eq!(summary.dropped_branch_tracts, 1);

    let rows = stored(&store).await;
    assert_eq!(
        rows,
        vec![
            DensityRecord::new("17031010100", 3, Some(12.4)),
            DensityRecord::new("17031010200", 0, Some(7.9)),
            DensityRecord::new("17031010300", 0, None),
        ]
    );
    assert!(rows.iter().all(|r| r.census_tract != "17031999999"));
}

#[tokio::test]
async fn workbook_without_credit_union_sheet_aborts() {
    let store = SqliteDensityStore::in_memory().await.unwrap();
    ingest_sources(
        &SourceTables {
            air_quality: vec![reading("A", Some(1.0))],
            branches: vec![],
        },
        &store,
    )
    .await
    .unwrap();

    let result = run_ingestion(&fixture_config("missing_credit_unions.xlsx"), &store).await;
    assert_matches!(
        result,
        Err(IngestError::MissingSheet { sheet, available })
            if sheet == "NCUA_IL_Q2_2024"
                && available == vec!["AirQuality_EPA_IL".to_string(), "SOD_IL_2024".to_string()]
    );
    assert_eq!(stored(&store).await, vec![DensityRecord::new("A", 0, Some(1.0))]);
}
