//! Parses a fare artifact to the internal `FareMatrix` representation, and writes it back.
//!
//! The artifact is tab-separated text, laid out as the scraper writes it:
//!
//! ```text
//! date    train   time_0     time_1     ...  time_n-1
//!                 station_0  station_1  ...  station_n-1
//! time_0  station_0  0       fare_0_1   ...  fare_0_n-1
//! time_1  station_1          0          ...  fare_1_n-1
//! ...
//! ```
//!
//! Fares use a comma as decimal separator, `?` marks an unknown fare and `0` the diagonal.

use std::{fs::File, io::Read, path::Path};

use ndarray::Array2;
use tracing::{debug, trace};

use crate::{
    error::AnalysisError,
    fares::{Fare, FareMatrix},
};

/// Columns before the payload in every row
const META_COLUMNS: usize = 2;
/// Marker for a fare the scraper could not find
const UNKNOWN_FARE: &str = "?";
/// Marker written on the diagonal
const DIAGONAL: &str = "0";

/// Reads a fare matrix from an artifact file
pub fn read_fare_matrix(path: impl AsRef<Path>) -> Result<FareMatrix, AnalysisError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AnalysisError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Reading fare artifact {:?}", path);
    fare_matrix_from_reader(file)
}

/// Reads a fare matrix from artifact text
pub fn fare_matrix_from_reader<R: Read>(reader: R) -> Result<FareMatrix, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    // The csv layer skips blank lines; a blank line still occupies its row so that
    // later fare rows stay aligned with their station
    let mut rows: Vec<csv::StringRecord> = vec![];
    for record in reader.records() {
        let record = record?;
        let line = record
            .position()
            .map_or(rows.len() + 1, |position| position.line() as usize);
        rows.resize(line.max(rows.len() + 1) - 1, csv::StringRecord::new());
        rows.push(record);
    }
    if rows.len() < 2 {
        return Err(AnalysisError::MalformedInput(format!(
            "expected two header rows, found {}",
            rows.len()
        )));
    }

    let date = rows[0].get(0).unwrap_or_default().trim().to_owned();
    let train = rows[0].get(1).unwrap_or_default().trim().to_owned();
    let times = payload(&rows[0]);
    let stations = payload(&rows[1]);
    let n = stations.len();

    // Rows and cells missing from the artifact stay unknown
    let mut prices = Array2::from_elem((n, n), None);
    for (i, row) in rows.iter().skip(2).take(n).enumerate() {
        for j in i + 1..n {
            if let Some(cell) = row.get(META_COLUMNS + j) {
                prices[[i, j]] = parse_fare_cell(cell);
            }
        }
    }
    if rows.len() < n + 2 {
        debug!("Only {} of {} fare rows present", rows.len().saturating_sub(2), n);
    }

    let matrix = FareMatrix::new(date, train, times, stations, prices)?;
    trace!("Parsed {} known fares for {} stations", matrix.segments().count(), matrix.n());
    Ok(matrix)
}

/// The trimmed, non-empty fields after the metadata columns
fn payload(row: &csv::StringRecord) -> Vec<String> {
    row.iter()
        .skip(META_COLUMNS)
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parses one fare cell. Placeholders and anything that is not a non-negative
/// decimal number give `None`.
pub fn parse_fare_cell(cell: &str) -> Option<Fare> {
    let cell = cell.trim();
    if cell.is_empty() || cell == UNKNOWN_FARE || cell == DIAGONAL {
        return None;
    }
    let fare = cell
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .and_then(Fare::from_decimal);
    if fare.is_none() {
        debug!("Unparseable fare cell {:?}, treating it as unknown", cell);
    }
    fare
}

/// Writes a fare matrix to an artifact file
#[cfg(test)]
pub fn write_fare_matrix(path: impl AsRef<Path>, matrix: &FareMatrix) -> Result<(), AnalysisError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| AnalysisError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Writing fare artifact {:?}", path);
    fare_matrix_to_writer(file, matrix)
}

/// Writes a fare matrix as artifact text
#[cfg(test)]
pub fn fare_matrix_to_writer<W: std::io::Write>(writer: W, matrix: &FareMatrix) -> Result<(), AnalysisError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(writer);

    writer.write_record(
        [matrix.date.as_str(), matrix.train.as_str()]
            .into_iter()
            .chain(matrix.times.iter().map(String::as_str)),
    )?;
    writer.write_record(["", ""].into_iter().chain(matrix.stations.iter().map(String::as_str)))?;

    let n = matrix.n();
    for i in 0..n {
        let time = matrix.times.get(i).cloned().unwrap_or_default();
        let row = [time, matrix.station(i).to_owned()]
            .into_iter()
            .chain(std::iter::repeat(String::new()).take(i))
            .chain(std::iter::once(DIAGONAL.to_owned()))
            .chain((i + 1..n).map(|j| {
                matrix
                    .fare(crate::fares::Segment::new(i, j))
                    .map_or_else(|| UNKNOWN_FARE.to_owned(), |fare| fare.display_with(','))
            }));
        writer.write_record(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
