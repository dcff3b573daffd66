//! In-memory sheet with a header row, and cell normalisation.

use crate::error::{IngestError, IngestResult};
use calamine::{Data, Range};

/// One worksheet: trimmed header names and the data rows beneath them.
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

impl SheetTable {
    /// Split `range` into the header row (first row) and data rows.
    pub fn from_range(name: &str, range: &Range<Data>) -> IngestResult<Self> {
        let mut rows = range.rows();
        let headers = rows
            .next()
            .ok_or_else(|| IngestError::EmptySheet {
                sheet: name.to_string(),
            })?
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        Ok(Self {
            name: name.to_string(),
            headers,
            rows: rows.map(|row| row.to_vec()).collect(),
        })
    }

    /// Position of `column`. Headers match exactly after trimming.
    pub fn column_index(&self, column: &str) -> IngestResult<usize> {
        let wanted = column.trim();
        self.headers
            .iter()
            .position(|h| h == wanted)
            .ok_or_else(|| IngestError::MissingColumn {
                sheet: self.name.clone(),
                column: column.to_string(),
                found: self.headers.clone(),
            })
    }

    /// Cells of one column, `Data::Empty` where a row is short.
    pub fn column(&self, column: &str) -> IngestResult<Vec<&Data>> {
        let index = self.column_index(column)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(index).unwrap_or(&Data::Empty))
            .collect())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Census tract cell as text. Integral numbers lose the fractional part
/// (`17031010100.0` becomes `"17031010100"`); blanks and error cells are `None`.
pub fn normalize_tract(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.is_finite() && value.fract() == 0.0 => {
            format!("{:.0}", value)
        }
        Data::String(value) => value.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Numeric reading; text is parsed, anything unparseable is `None`.
pub fn reading_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(value) if value.is_finite() => Some(*value),
        Data::Int(value) => Some(*value as f64),
        Data::String(value) => value.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use calamine::{Data, Range};

    /// Build a range from rows of cells, first row being the header.
    pub fn range(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width.max(1) - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    pub fn text(value: &str) -> Data {
        Data::String(value.to_string())
    }
}
