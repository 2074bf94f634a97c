use csv::{ReaderBuilder, StringRecord, Writer};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::data_value::Value;
use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Read a DataFrame from a CSV file
pub fn read_csv<P: AsRef<Path>>(path: P, has_header: bool) -> Result<DataFrame> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;
    read_csv_from_reader(file, has_header)
}

/// Read a DataFrame from any CSV source.
///
/// Column types are inferred from the non-empty cells: integer, then float,
/// then boolean, then datetime, falling back to string. Empty cells are null.
pub fn read_csv_from_reader<R: Read>(reader: R, has_header: bool) -> Result<DataFrame> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records = rdr
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()
        .map_err(Error::Csv)?;

    let headers: Vec<String> = if has_header {
        rdr.headers()
            .map_err(Error::Csv)?
            .iter()
            .map(|h| h.to_string())
            .collect()
    } else {
        let width = records.iter().map(|r| r.len()).max().unwrap_or(0);
        (0..width).map(|i| format!("column_{}", i)).collect()
    };

    let mut df = DataFrame::new();
    for (i, header) in headers.iter().enumerate() {
        // Short rows are padded with empty cells
        let cells: Vec<&str> = records.iter().map(|r| r.get(i).unwrap_or("")).collect();
        df.add_column(header.clone(), infer_column(&cells))?;
    }

    log::debug!(
        "read csv: {} rows, {} columns",
        df.row_count(),
        df.column_count()
    );
    Ok(df)
}

fn infer_column(cells: &[&str]) -> Vec<Value> {
    let present = || cells.iter().filter(|c| !c.is_empty());

    if present().all(|c| c.parse::<i64>().is_ok()) {
        return convert(cells, |c| c.parse::<i64>().ok().map(Value::Int64));
    }
    if present().all(|c| c.parse::<f64>().is_ok()) {
        return convert(cells, |c| c.parse::<f64>().ok().map(Value::Float64));
    }
    if present().all(|c| parse_bool(c).is_some()) {
        return convert(cells, |c| parse_bool(c).map(Value::Boolean));
    }
    if present().all(|c| parse_datetime(c).is_some()) {
        return convert(cells, |c| parse_datetime(c).map(Value::DateTime));
    }
    convert(cells, |c| Some(Value::String(c.to_string())))
}

fn convert<F>(cells: &[&str], parse: F) -> Vec<Value>
where
    F: Fn(&str) -> Option<Value>,
{
    cells
        .iter()
        .map(|c| {
            if c.is_empty() {
                Value::Null
            } else {
                parse(c).unwrap_or(Value::Null)
            }
        })
        .collect()
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_datetime(cell: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(cell, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Write a DataFrame to a CSV file. Null cells are written empty.
pub fn write_csv<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(Error::Io)?;
    let mut wtr = Writer::from_writer(file);

    let names = df.column_names();
    wtr.write_record(&names).map_err(Error::Csv)?;

    let columns = names
        .iter()
        .map(|name| df.column(name))
        .collect::<Result<Vec<_>>>()?;

    for row in 0..df.row_count() {
        let record: Vec<String> = columns
            .iter()
            .map(|column| match column.get(row) {
                Some(Value::Null) | None => String::new(),
                Some(value) => value.to_string(),
            })
            .collect();
        wtr.write_record(&record).map_err(Error::Csv)?;
    }

    wtr.flush().map_err(Error::Io)?;
    Ok(())
}
