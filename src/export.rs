use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::binder::{PieChart, ScatterChart, ViewBinder};
use crate::data::model::{PayloadRange, SiteSelector};

// ---------------------------------------------------------------------------
// Chart data export
// ---------------------------------------------------------------------------

/// What both charts show for one selector state.
#[derive(Debug, Serialize)]
pub struct ChartSnapshot {
    pub site: SiteSelector,
    pub payload_range: PayloadRange,
    pub pie: PieChart,
    pub scatter: ScatterChart,
}

impl ChartSnapshot {
    pub fn capture(binder: &ViewBinder) -> Self {
        let (pie, scatter) = binder.snapshot();
        Self {
            site: binder.site().clone(),
            payload_range: binder.range(),
            pie,
            scatter,
        }
    }
}

/// Write the snapshot as pretty-printed JSON.
pub fn write_json(snapshot: &ChartSnapshot, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)
        .with_context(|| format!("writing chart data to {}", path.display()))?;
    writer.flush()?;
    log::info!("exported chart data to {}", path.display());
    Ok(())
}
