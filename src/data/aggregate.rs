use std::collections::BTreeMap;

use super::filter::records_at_site;
use super::model::{AggregateRow, LaunchRecord, Outcome, SiteSelector};

// ---------------------------------------------------------------------------
// Grouped counts for the proportion chart
// ---------------------------------------------------------------------------

/// Aggregate for the proportion chart. The payload range never applies here.
///
/// * `All`: successful launches per site.
/// * a single site: launch count per outcome at that site.
pub fn aggregate(records: &[LaunchRecord], site: &SiteSelector) -> Vec<AggregateRow> {
    match site {
        SiteSelector::All => successes_by_site(records),
        SiteSelector::Site(_) => outcomes_at_site(records, site),
    }
}

/// Count `outcome == 1` per site. Rows follow the order in which sites first
/// appear in the table (the site control's order); sites with no success are
/// omitted.
pub fn successes_by_site(records: &[LaunchRecord]) -> Vec<AggregateRow> {
    let mut rows: Vec<AggregateRow> = Vec::new();
    for rec in records {
        let hit = usize::from(rec.outcome.is_success());
        match rows.iter_mut().find(|row| row.group_key == rec.site) {
            Some(row) => row.count += hit,
            None => rows.push(AggregateRow {
                group_key: rec.site.clone(),
                count: hit,
            }),
        }
    }
    rows.retain(|row| row.count > 0);
    rows
}

/// Count launches per outcome at the selected site, failure before success.
/// Only outcomes that occur are emitted.
pub fn outcomes_at_site(records: &[LaunchRecord], site: &SiteSelector) -> Vec<AggregateRow> {
    let mut counts: BTreeMap<Outcome, usize> = BTreeMap::new();
    for rec in records_at_site(records, site) {
        *counts.entry(rec.outcome).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(outcome, count)| AggregateRow {
            group_key: outcome.to_string(),
            count,
        })
        .collect()
}
