use std::sync::Arc;

use serde::Serialize;

use crate::data::aggregate::aggregate;
use crate::data::filter::filter_records;
use crate::data::model::{AggregateRow, LaunchDataset, PayloadRange, ScatterPoint, SiteSelector};

// ---------------------------------------------------------------------------
// Pure chart data functions
// ---------------------------------------------------------------------------

/// Proportion chart rows for `site`. The payload range deliberately plays no
/// part here; only the scatter chart honours it.
pub fn compute_pie(dataset: &LaunchDataset, site: &SiteSelector) -> Vec<AggregateRow> {
    aggregate(dataset.records(), site)
}

/// Scatter chart points for `site` within `range`.
pub fn compute_scatter(
    dataset: &LaunchDataset,
    site: &SiteSelector,
    range: &PayloadRange,
) -> Vec<ScatterPoint> {
    filter_records(dataset.records(), site, range)
        .into_iter()
        .map(ScatterPoint::from)
        .collect()
}

pub fn pie_title(site: &SiteSelector) -> String {
    match site {
        SiteSelector::All => "Total successful launches by site".to_string(),
        SiteSelector::Site(s) => format!("Total successful launches in {s}"),
    }
}

pub fn scatter_title(site: &SiteSelector) -> String {
    match site {
        SiteSelector::All => "Correlation between Payload and Success for all sites".to_string(),
        SiteSelector::Site(s) => format!("Correlation between Payload and Success for site {s}"),
    }
}

// ---------------------------------------------------------------------------
// Messages in and out of the binder
// ---------------------------------------------------------------------------

/// A change coming from one of the selector controls.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorEvent {
    SiteSelected(SiteSelector),
    PayloadRangeChanged(PayloadRange),
    /// Back to `ALL` and the full observed payload range.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub rows: Vec<AggregateRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub points: Vec<ScatterPoint>,
}

/// Fresh data for one chart, to be handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartUpdate {
    Pie(PieChart),
    Scatter(ScatterChart),
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Holds the current selector state and turns selector events into chart
/// updates. Outputs depend only on `(site, range)`, never on event history.
#[derive(Debug, Clone)]
pub struct ViewBinder {
    dataset: Arc<LaunchDataset>,
    site: SiteSelector,
    range: PayloadRange,
}

impl ViewBinder {
    /// Start at `ALL` with the full observed payload range.
    pub fn new(dataset: Arc<LaunchDataset>) -> Self {
        let range = dataset.payload_bounds();
        Self {
            dataset,
            site: SiteSelector::All,
            range,
        }
    }

    pub fn dataset(&self) -> &Arc<LaunchDataset> {
        &self.dataset
    }

    pub fn site(&self) -> &SiteSelector {
        &self.site
    }

    pub fn range(&self) -> PayloadRange {
        self.range
    }

    /// Apply an event and return the charts it invalidates.
    ///
    /// A site change touches both charts; a range change touches only the
    /// scatter chart.
    pub fn dispatch(&mut self, event: SelectorEvent) -> Vec<ChartUpdate> {
        log::debug!("selector event: {event:?}");
        match event {
            SelectorEvent::SiteSelected(site) => {
                self.site = site;
                vec![self.pie_update(), self.scatter_update()]
            }
            SelectorEvent::PayloadRangeChanged(range) => {
                self.range = range;
                vec![self.scatter_update()]
            }
            SelectorEvent::Reset => {
                self.site = SiteSelector::All;
                self.range = self.dataset.payload_bounds();
                vec![self.pie_update(), self.scatter_update()]
            }
        }
    }

    /// Both charts for the current selector state.
    pub fn snapshot(&self) -> (PieChart, ScatterChart) {
        (self.pie_chart(), self.scatter_chart())
    }

    pub fn pie_chart(&self) -> PieChart {
        PieChart {
            title: pie_title(&self.site),
            rows: compute_pie(&self.dataset, &self.site),
        }
    }

    pub fn scatter_chart(&self) -> ScatterChart {
        ScatterChart {
            title: scatter_title(&self.site),
            points: compute_scatter(&self.dataset, &self.site, &self.range),
        }
    }

    fn pie_update(&self) -> ChartUpdate {
        ChartUpdate::Pie(self.pie_chart())
    }

    fn scatter_update(&self) -> ChartUpdate {
        ChartUpdate::Scatter(self.scatter_chart())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;
    use crate::data::model::Outcome;

    fn binder() -> ViewBinder {
        ViewBinder::new(Arc::new(sample_dataset()))
    }

    fn range(low: f64, high: f64) -> PayloadRange {
        PayloadRange::new(low, high).unwrap()
    }

    #[test]
    fn pie_ignores_payload_range() {
        let ds = sample_dataset();
        let full = compute_pie(&ds, &SiteSelector::All);

        let mut b = binder();
        b.dispatch(SelectorEvent::PayloadRangeChanged(range(2000.0, 2000.0)));
        assert_eq!(b.pie_chart().rows, full);

        let successes = ds.records().iter().filter(|r| r.outcome.is_success()).count();
        assert_eq!(full.iter().map(|r| r.count).sum::<usize>(), successes);
    }

    #[test]
    fn scatter_for_site_and_range() {
        let ds = sample_dataset();
        let points = compute_scatter(&ds, &SiteSelector::parse("KSC"), &range(2000.0, 6000.0));
        let payloads: Vec<f64> = points.iter().map(|p| p.payload_mass_kg).collect();
        assert_eq!(payloads, vec![2490.0, 5300.0, 6000.0, 2000.0]);
        assert_eq!(points[2].booster_version_category, "B4");
        assert_eq!(points[2].outcome, Outcome::Failure);
    }

    #[test]
    fn scatter_is_elementwise_subset_of_dataset() {
        let ds = sample_dataset();
        let r = range(500.0, 6000.0);
        for site in ds.site_options() {
            let points = compute_scatter(&ds, &site, &r);
            let expected: Vec<ScatterPoint> = ds
                .records()
                .iter()
                .filter(|rec| site.matches(&rec.site) && r.contains(rec.payload_mass_kg))
                .map(ScatterPoint::from)
                .collect();
            assert_eq!(points, expected, "site {site}");
        }
    }

    #[test]
    fn compute_functions_are_idempotent() {
        let ds = sample_dataset();
        let site = SiteSelector::parse("CCAFS");
        let r = range(0.0, 3000.0);
        assert_eq!(compute_pie(&ds, &site), compute_pie(&ds, &site));
        assert_eq!(compute_scatter(&ds, &site, &r), compute_scatter(&ds, &site, &r));
    }

    #[test]
    fn range_event_updates_only_scatter() {
        let mut b = binder();
        let updates = b.dispatch(SelectorEvent::PayloadRangeChanged(range(0.0, 600.0)));
        assert_eq!(updates.len(), 1);
        match &updates[0] {
            ChartUpdate::Scatter(chart) => assert_eq!(chart.points.len(), 3),
            other => panic!("unexpected update {other:?}"),
        }
    }

    #[test]
    fn site_event_updates_both_charts_and_keeps_range() {
        let mut b = binder();
        b.dispatch(SelectorEvent::PayloadRangeChanged(range(0.0, 600.0)));
        let updates = b.dispatch(SelectorEvent::SiteSelected(SiteSelector::parse("VAFB")));
        assert_eq!(
            updates,
            vec![
                ChartUpdate::Pie(PieChart {
                    title: "Total successful launches in VAFB".into(),
                    rows: vec![
                        AggregateRow { group_key: "0".into(), count: 1 },
                        AggregateRow { group_key: "1".into(), count: 1 },
                    ],
                }),
                ChartUpdate::Scatter(ScatterChart {
                    title: "Correlation between Payload and Success for site VAFB".into(),
                    points: vec![ScatterPoint::from(&sample_dataset().records()[2])],
                }),
            ]
        );
    }

    #[test]
    fn outputs_do_not_depend_on_event_history() {
        let mut direct = binder();
        direct.dispatch(SelectorEvent::SiteSelected(SiteSelector::parse("KSC")));

        let mut wandering = binder();
        wandering.dispatch(SelectorEvent::SiteSelected(SiteSelector::parse("VAFB")));
        wandering.dispatch(SelectorEvent::PayloadRangeChanged(range(100.0, 200.0)));
        wandering.dispatch(SelectorEvent::Reset);
        wandering.dispatch(SelectorEvent::SiteSelected(SiteSelector::parse("KSC")));

        assert_eq!(direct.snapshot(), wandering.snapshot());
    }

    #[test]
    fn unknown_site_gives_empty_charts() {
        let mut b = binder();
        b.dispatch(SelectorEvent::SiteSelected(SiteSelector::parse("Omelek")));
        let (pie, scatter) = b.snapshot();
        assert!(pie.rows.is_empty());
        assert!(scatter.points.is_empty());
    }

    #[test]
    fn titles() {
        assert_eq!(pie_title(&SiteSelector::All), "Total successful launches by site");
        assert_eq!(
            scatter_title(&SiteSelector::All),
            "Correlation between Payload and Success for all sites"
        );
        assert_eq!(
            pie_title(&SiteSelector::parse("KSC LC-39A")),
            "Total successful launches in KSC LC-39A"
        );
    }
}
