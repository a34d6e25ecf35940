use super::model::{LaunchRecord, PayloadRange, SiteSelector};

// ---------------------------------------------------------------------------
// Filter engine: site equality + inclusive payload range
// ---------------------------------------------------------------------------

/// Return the records that pass both predicates, in input order.
///
/// * `SiteSelector::All` skips the site predicate; any other selector keeps
///   only exact site matches (an unknown site therefore matches nothing).
/// * The payload predicate is always applied, inclusive on both ends.
///
/// `range` is trusted to be valid; [`PayloadRange::new`] enforces `low <= high`.
pub fn filter_records<'a>(
    records: &'a [LaunchRecord],
    site: &SiteSelector,
    range: &PayloadRange,
) -> Vec<&'a LaunchRecord> {
    records
        .iter()
        .filter(|rec| site.matches(&rec.site) && range.contains(rec.payload_mass_kg))
        .collect()
}

/// Records at the selected site(s), ignoring payload.
pub fn records_at_site<'a>(
    records: &'a [LaunchRecord],
    site: &SiteSelector,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    let site = site.clone();
    records.iter().filter(move |rec| site.matches(&rec.site))
}
