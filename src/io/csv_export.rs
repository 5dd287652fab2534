use crate::error::Result;
use crate::model::quake::TIMESTAMP_FORMAT;
use crate::model::Quake;
use std::path::Path;

const HEADER: [&str; 5] = ["Date-time", "Latitude", "Longitude", "Depth", "Mw_mean"];

/// Export records to a comma-delimited CSV file matching the import format.
///
/// Returns the number of records written.
pub fn export_csv(quakes: &[&Quake], path: &Path) -> Result<usize> {
    let wtr = csv::WriterBuilder::new().from_path(path)?;
    write_records(wtr, quakes)
}

fn write_records<W: std::io::Write>(mut wtr: csv::Writer<W>, quakes: &[&Quake]) -> Result<usize> {
    wtr.write_record(HEADER)?;
    for quake in quakes {
        wtr.write_record([
            quake.time.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.4}", quake.latitude),
            format!("{:.4}", quake.longitude),
            format!("{:.1}", quake.depth),
            format!("{:.1}", quake.magnitude),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(quakes.len())
}
