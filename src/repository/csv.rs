//! CSV ingestion for the allocation pipeline
//!
//! Loads daily summary rows and accepted well parameters from CSV files,
//! for replaying exported field data without a database. Column order is
//! free; columns are located by header name, case-insensitively. Blank
//! cells map to missing measurements.
//!
//! # Expected headers
//!
//! Daily summaries: `date`, then any of `export_gas`, `flared_gas`,
//! `hp_gas_flow`, `compressor_gas_rate`, `comp_fuel_gas`.
//!
//! Well parameters: `well_id`, `well_name`, `well_type`, `days_on`,
//! `avg_qg_inj`, `qg_tot`, optional `test_date`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::types::{DailySummaryRow, WellParameterRow};

/// Errors raised while loading a CSV file.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: empty file (no header row)")]
    Empty { path: PathBuf },
    #[error("{path}: missing required column `{column}`")]
    MissingColumn { path: PathBuf, column: String },
    #[error("{path}:{line}: bad value `{value}` in column `{column}`")]
    BadValue {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },
}

/// Split a CSV line respecting quoted fields (handles commas inside
/// quotes and escaped quotes).
fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Header name → column index, lowercased and trimmed.
fn header_map(header: &str) -> HashMap<String, usize> {
    csv_split(header)
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_ascii_lowercase(), i))
        .collect()
}

fn cell<'a>(fields: &'a [String], index: Option<usize>) -> Option<&'a str> {
    index
        .and_then(|i| fields.get(i))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

struct LineContext<'a> {
    path: &'a Path,
    line: usize,
}

impl LineContext<'_> {
    fn opt_f64(&self, fields: &[String], index: Option<usize>, column: &str) -> Result<Option<f64>, CsvError> {
        match cell(fields, index) {
            None => Ok(None),
            Some(raw) => raw.parse::<f64>().map(Some).map_err(|_| CsvError::BadValue {
                path: self.path.to_path_buf(),
                line: self.line,
                column: column.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    fn date(&self, raw: &str, column: &str) -> Result<NaiveDate, CsvError> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| CsvError::BadValue {
            path: self.path.to_path_buf(),
            line: self.line,
            column: column.to_string(),
            value: raw.to_string(),
        })
    }
}

fn open_lines(path: &Path) -> Result<std::io::Lines<BufReader<File>>, CsvError> {
    let file = File::open(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file).lines())
}

fn require(
    headers: &HashMap<String, usize>,
    path: &Path,
    column: &str,
) -> Result<usize, CsvError> {
    headers.get(column).copied().ok_or_else(|| CsvError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    })
}

/// Load daily summary rows from a CSV file.
pub fn load_daily_summaries(path: &Path) -> Result<Vec<DailySummaryRow>, CsvError> {
    let mut lines = open_lines(path)?;

    let header = lines
        .next()
        .transpose()
        .map_err(|source| CsvError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| CsvError::Empty {
            path: path.to_path_buf(),
        })?;
    let headers = header_map(&header);

    let date_col = require(&headers, path, "date")?;
    let export_col = headers.get("export_gas").copied();
    let flared_col = headers.get("flared_gas").copied();
    let hp_col = headers.get("hp_gas_flow").copied();
    let comp_col = headers.get("compressor_gas_rate").copied();
    let fuel_col = headers.get("comp_fuel_gas").copied();

    let mut rows = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line.map_err(|source| CsvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = csv_split(&line);
        let ctx = LineContext {
            path,
            line: line_no + 2,
        };

        let raw_date = cell(&fields, Some(date_col)).unwrap_or("");
        let calc_date = ctx.date(raw_date, "date")?;

        rows.push(DailySummaryRow {
            calc_date,
            export_gas: ctx.opt_f64(&fields, export_col, "export_gas")?,
            flared_gas: ctx.opt_f64(&fields, flared_col, "flared_gas")?,
            hp_gas_flow: ctx.opt_f64(&fields, hp_col, "hp_gas_flow")?,
            compressor_gas_rate: ctx.opt_f64(&fields, comp_col, "compressor_gas_rate")?,
            comp_fuel_gas: ctx.opt_f64(&fields, fuel_col, "comp_fuel_gas")?,
        });
    }

    info!(path = %path.display(), rows = rows.len(), "loaded daily summaries");
    Ok(rows)
}

/// Load accepted well parameter rows from a CSV file, preserving file order.
pub fn load_well_parameters(path: &Path) -> Result<Vec<WellParameterRow>, CsvError> {
    let mut lines = open_lines(path)?;

    let header = lines
        .next()
        .transpose()
        .map_err(|source| CsvError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| CsvError::Empty {
            path: path.to_path_buf(),
        })?;
    let headers = header_map(&header);

    let id_col = require(&headers, path, "well_id")?;
    let name_col = headers.get("well_name").copied();
    let type_col = headers.get("well_type").copied();
    let days_col = require(&headers, path, "days_on")?;
    let inj_col = require(&headers, path, "avg_qg_inj")?;
    let tot_col = require(&headers, path, "qg_tot")?;
    let test_col = headers.get("test_date").copied();

    let mut rows = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line.map_err(|source| CsvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = csv_split(&line);
        let ctx = LineContext {
            path,
            line: line_no + 2,
        };

        let raw_id = cell(&fields, Some(id_col)).unwrap_or("");
        let well_id = raw_id.parse::<i64>().map_err(|_| CsvError::BadValue {
            path: path.to_path_buf(),
            line: ctx.line,
            column: "well_id".to_string(),
            value: raw_id.to_string(),
        })?;

        // days_on is nullable in the source schema; blank means down all period
        let days_on = match cell(&fields, Some(days_col)) {
            None => 0,
            Some(raw) => raw.parse::<i64>().map_err(|_| CsvError::BadValue {
                path: path.to_path_buf(),
                line: ctx.line,
                column: "days_on".to_string(),
                value: raw.to_string(),
            })?,
        };

        let test_date = match cell(&fields, test_col) {
            None => None,
            Some(raw) => Some(ctx.date(raw, "test_date")?),
        };

        rows.push(WellParameterRow {
            well_id,
            well_name: cell(&fields, name_col).unwrap_or("Unknown").to_string(),
            well_type: cell(&fields, type_col).map(str::to_string),
            days_on,
            avg_qg_inj: ctx.opt_f64(&fields, Some(inj_col), "avg_qg_inj")?.unwrap_or(0.0),
            qg_tot: ctx.opt_f64(&fields, Some(tot_col), "qg_tot")?.unwrap_or(0.0),
            test_date,
        });
    }

    info!(path = %path.display(), wells = rows.len(), "loaded well parameters");
    Ok(rows)
}
