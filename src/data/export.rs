use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::filter::FilteredView;
use super::model::NormalizedDataset;

/// Write the kept listings as CSV: the dataset's columns as header, cleaned
/// values for the recognized columns and passthrough cells as loaded.
pub fn write_filtered_csv<W: Write>(
    dataset: &NormalizedDataset,
    view: &FilteredView,
    writer: W,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(&dataset.columns)
        .context("writing CSV header")?;

    for row in view.rows(dataset) {
        writer
            .write_record(dataset.columns.iter().map(|col| row.display_value(col)))
            .context("writing CSV record")?;
    }

    writer.flush()?;
    Ok(())
}

/// Save the kept listings to `path`.
pub fn save_filtered_csv(dataset: &NormalizedDataset, view: &FilteredView, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    write_filtered_csv(dataset, view, file)?;
    log::info!("Exported {} listings to {}", view.count, path.display());
    Ok(())
}
