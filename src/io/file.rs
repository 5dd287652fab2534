use crate::error::{AppError, Result};
use crate::model::Quake;
use std::path::Path;

/// Load a catalogue, picking the parser from the file extension.
///
/// Returns `(quakes, skipped_rows)`; JSON files never skip rows.
pub fn load_quakes(path: &Path) -> Result<(Vec<Quake>, usize)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let (mut quakes, skipped) = match ext.as_str() {
        "json" => (load_json(path)?, 0),
        "csv" | "txt" | "tsv" => crate::io::csv_import::import_csv(path)?,
        other => return Err(AppError::UnsupportedFile(other.to_string())),
    };
    quakes.sort_by(|a, b| b.time.cmp(&a.time));

    log::info!(
        "loaded {} quakes from {} ({} skipped)",
        quakes.len(),
        path.display(),
        skipped
    );
    Ok((quakes, skipped))
}

/// Load a JSON array of catalogue records.
pub fn load_json(path: &Path) -> Result<Vec<Quake>> {
    let json = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    serde_json::from_str(&json).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Save records as a JSON array in the feed's format.
pub fn save_json(quakes: &[&Quake], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(quakes).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|e| AppError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("quake-timewindow-{}-{name}", std::process::id()))
    }

    #[test]
    fn json_round_trip_through_disk() {
        let path = temp_path("feed.json");
        let json = r#"[
            {"Date-time": "2021-03-01 08:00:00", "Latitude": 63.9, "Longitude": -22.3, "Depth": 3.0, "Mw_mean": 3.2},
            {"Date-time": "2022-08-03 13:14:15", "Latitude": 63.8, "Longitude": -22.2, "Depth": 5.5, "Mw_mean": 4.6}
        ]"#;
        std::fs::write(&path, json).unwrap();

        let (quakes, skipped) = load_quakes(&path).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(quakes.len(), 2);
        // Newest first.
        assert_eq!(quakes[0].magnitude, 4.6);

        let refs: Vec<&Quake> = quakes.iter().collect();
        save_json(&refs, &path).unwrap();
        assert_eq!(load_json(&path).unwrap(), quakes);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_quakes(Path::new("catalogue.xlsx")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFile(ext) if ext == "xlsx"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_quakes(Path::new("/nonexistent/quakes.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/quakes.json"));
    }
}
