use std::path::Path;

use crate::error::{AppError, Result};
use crate::model::quake::parse_timestamp;
use crate::model::Quake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Time,
    Magnitude,
    Latitude,
    Longitude,
    Depth,
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons > commas && semicolons >= tabs {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_', '(', ')'], "")
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "datetime" | "date" | "time" | "timestamp" | "origintime" | "utc" => Some(Column::Time),

        "mwmean" | "mw" | "magnitude" | "mag" | "ml" | "m" => Some(Column::Magnitude),

        "latitude" | "lat" => Some(Column::Latitude),

        "longitude" | "lon" | "lng" | "long" => Some(Column::Longitude),

        "depth" | "depthkm" | "z" => Some(Column::Depth),

        _ => None,
    }
}

fn parse_number(s: Option<&str>) -> Option<f64> {
    s.and_then(|s| s.trim().replace(',', ".").parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Import catalogue records from a CSV file.
///
/// Auto-detects the delimiter (comma, semicolon, tab) and matches headers
/// loosely ("Date-time", "Mw_mean", "Depth (km)", ...). Rows without a
/// usable timestamp or magnitude are skipped. Returns `(quakes, skipped)`.
pub fn import_csv(path: &Path) -> Result<(Vec<Quake>, usize)> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    import_csv_str(&content)
}

pub fn import_csv_str(content: &str) -> Result<(Vec<Quake>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let has = |col: Column| col_map.iter().any(|c| *c == Some(col));
    if !has(Column::Time) || !has(Column::Magnitude) {
        return Err(AppError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut quakes = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping CSV row {row}: {e}");
                skipped += 1;
                continue;
            }
        };

        let field = |col: Column| {
            col_map
                .iter()
                .position(|c| *c == Some(col))
                .and_then(|idx| record.get(idx))
        };

        let Some(time) = field(Column::Time).and_then(parse_timestamp) else {
            log::warn!(
                "skipping CSV row {row}: invalid timestamp '{}'",
                field(Column::Time).unwrap_or("")
            );
            skipped += 1;
            continue;
        };
        let Some(magnitude) = parse_number(field(Column::Magnitude)) else {
            log::warn!(
                "skipping CSV row {row}: invalid magnitude '{}'",
                field(Column::Magnitude).unwrap_or("")
            );
            skipped += 1;
            continue;
        };

        quakes.push(Quake {
            time,
            latitude: parse_number(field(Column::Latitude)).unwrap_or(0.0),
            longitude: parse_number(field(Column::Longitude)).unwrap_or(0.0),
            depth: parse_number(field(Column::Depth)).unwrap_or(0.0),
            magnitude,
        });
    }

    if quakes.is_empty() {
        return Err(AppError::NoRecords { skipped });
    }

    Ok((quakes, skipped))
}
