//! CSV Data Loader Module
//! Loads the vehicle registration table using Polars.

use polars::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Load a CSV file with a header row into a DataFrame.
pub fn try_load_vehicle_data(file_path: &Path) -> Result<DataFrame, LoaderError> {
    match std::fs::metadata(file_path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(LoaderError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a regular file", file_path.display()),
            )))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoaderError::NotFound(file_path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    }

    let df = LazyCsvReader::new(file_path)
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    debug!(
        rows = df.height(),
        columns = df.width(),
        "Parsed {}",
        file_path.display()
    );
    Ok(df)
}

/// Load vehicle data, reporting any failure and returning `None` instead of an error.
pub fn load_vehicle_data(file_path: &Path) -> Option<DataFrame> {
    match try_load_vehicle_data(file_path) {
        Ok(df) => Some(df),
        Err(LoaderError::NotFound(path)) => {
            error!("Error: File '{}' not found", path.display());
            None
        }
        Err(e) => {
            error!("Error loading the CSV file: {}", e);
            None
        }
    }
}

/// Get the number of rows in the DataFrame.
pub fn row_count(df: &DataFrame) -> usize {
    df.height()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_rows_and_columns() {
        let file = csv_file("plate,make\nBO55AAA,Ford\nBO55AAB,BMW\nBO55AAC,Ford\n");
        let df = try_load_vehicle_data(file.path()).unwrap();

        assert_eq!(row_count(&df), 3);
        assert!(df.column("make").is_ok());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");

        let err = try_load_vehicle_data(&path).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(ref p) if p == &path));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn missing_file_yields_no_data() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_vehicle_data(&dir.path().join("nope.csv")).is_none());
    }

    #[test]
    fn directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = try_load_vehicle_data(dir.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Io(_)));
        assert!(load_vehicle_data(dir.path()).is_none());
    }

    #[test]
    fn header_only_file_loads_empty_table() {
        let file = csv_file("plate,make\n");
        let df = try_load_vehicle_data(file.path()).unwrap();
        assert_eq!(row_count(&df), 0);
    }
}
