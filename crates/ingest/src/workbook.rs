//! Workbook access through calamine.

use crate::error::{IngestError, IngestResult};
use crate::merge::{read_air_quality, read_branches, BranchType, SourceTables};
use crate::sheet::SheetTable;
use calamine::{open_workbook_auto, Reader, Sheets};
use config::IngestConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

pub type Workbook = Sheets<BufReader<File>>;

/// Open an xlsx/xlsm/xlsb/xls/ods file; the format is picked from the extension.
pub fn open(path: &Path) -> IngestResult<Workbook> {
    open_workbook_auto(path).map_err(|e| IngestError::WorkbookOpen {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

pub fn read_sheet(workbook: &mut Workbook, sheet: &str) -> IngestResult<SheetTable> {
    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        return Err(IngestError::MissingSheet {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| IngestError::SheetRead {
            sheet: sheet.to_string(),
            message: e.to_string(),
        })?;

    let table = SheetTable::from_range(sheet, &range)?;
    debug!(sheet, rows = table.row_count(), "Loaded sheet");
    Ok(table)
}

/// Read the three configured sheets.
pub fn load_sources(config: &IngestConfig) -> IngestResult<SourceTables> {
    let path = Path::new(&config.workbook);
    info!("Reading workbook '{}'", path.display());
    let mut workbook = open(path)?;

    let air_quality = read_sheet(&mut workbook, &config.air_quality.sheet)?;
    let banks = read_sheet(&mut workbook, &config.bank_branches.sheet)?;
    let credit_unions = read_sheet(&mut workbook, &config.credit_union_branches.sheet)?;

    let mut branches = read_branches(&banks, &config.bank_branches, BranchType::Bank)?;
    branches.extend(read_branches(
        &credit_unions,
        &config.credit_union_branches,
        BranchType::CreditUnion,
    )?);

    Ok(SourceTables {
        air_quality: read_air_quality(&air_quality, &config.air_quality)?,
        branches,
    })
}
