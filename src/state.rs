use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;

use crate::binder::{ChartUpdate, PieChart, ScatterChart, SelectorEvent, ViewBinder};
use crate::color::{CategoryColors, SliceColors};
use crate::data::model::{LaunchDataset, PayloadRange, SiteSelector};
use crate::export::{self, ChartSnapshot};

/// Number of labelled marks on the range control.
const SLIDER_MARKS: usize = 5;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Current selectors and the dataset handle.
    pub binder: ViewBinder,

    /// Data currently shown by the proportion chart.
    pub pie: PieChart,

    /// Data currently shown by the scatter chart.
    pub scatter: ScatterChart,

    /// Colour per booster category.
    pub category_colors: CategoryColors,

    /// Colour per proportion chart slice (site or outcome).
    pub slice_colors: SliceColors,

    /// Text typed into the site control's search box.
    pub site_filter: String,

    /// Range control draft values; only valid ranges leave the control.
    pub range_draft: [f64; 2],

    /// Slider step for the payload range control.
    pub payload_step: f64,

    /// Events queued by widgets this frame, applied in order.
    pending: Vec<SelectorEvent>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<LaunchDataset>, payload_step: f64) -> Self {
        let category_colors = CategoryColors::new(dataset.categories());
        let slice_colors = SliceColors::new(dataset.sites());
        let binder = ViewBinder::new(dataset);
        let (pie, scatter) = binder.snapshot();
        let range = binder.range();
        Self {
            binder,
            pie,
            scatter,
            category_colors,
            slice_colors,
            site_filter: String::new(),
            range_draft: [range.low(), range.high()],
            payload_step,
            pending: Vec::new(),
            status_message: None,
        }
    }

    pub fn dataset(&self) -> &LaunchDataset {
        self.binder.dataset()
    }

    pub fn site(&self) -> &SiteSelector {
        self.binder.site()
    }

    pub fn range(&self) -> PayloadRange {
        self.binder.range()
    }

    /// Slider extent: the observed payload bounds widened to whole steps so
    /// both extremes stay reachable.
    pub fn slider_bounds(&self) -> RangeInclusive<f64> {
        let bounds = self.dataset().payload_bounds();
        let step = self.payload_step;
        (bounds.low() / step).floor() * step..=(bounds.high() / step).ceil() * step
    }

    /// Evenly spaced labelled values along the range control, ends included.
    pub fn slider_marks(&self) -> Vec<f64> {
        let bounds = self.slider_bounds();
        let (low, high) = (*bounds.start(), *bounds.end());
        (0..SLIDER_MARKS)
            .map(|i| low + (high - low) * i as f64 / (SLIDER_MARKS - 1) as f64)
            .collect()
    }

    /// Site options whose label contains the search text, ignoring case.
    /// The all-sites option is always offered.
    pub fn filtered_site_options(&self) -> Vec<SiteSelector> {
        let needle = self.site_filter.trim().to_lowercase();
        self.dataset()
            .site_options()
            .into_iter()
            .filter(|option| match option {
                SiteSelector::All => true,
                SiteSelector::Site(site) => site.to_lowercase().contains(&needle),
            })
            .collect()
    }

    /// Queue a site change.
    pub fn select_site(&mut self, site: SiteSelector) {
        self.pending.push(SelectorEvent::SiteSelected(site));
    }

    /// Validate the range draft and queue it. An inverted draft is pulled
    /// back so the edited end never crosses the other one.
    pub fn commit_range_draft(&mut self, low_edited: bool) {
        let [low, high] = &mut self.range_draft;
        if *low > *high {
            if low_edited {
                *low = *high;
            } else {
                *high = *low;
            }
        }
        match PayloadRange::new(*low, *high) {
            Ok(range) => self.pending.push(SelectorEvent::PayloadRangeChanged(range)),
            Err(e) => {
                log::warn!("range control rejected: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }

    pub fn reset(&mut self) {
        self.pending.push(SelectorEvent::Reset);
    }

    /// Dispatch queued events and apply the resulting chart updates.
    pub fn flush_events(&mut self) {
        for event in std::mem::take(&mut self.pending) {
            for update in self.binder.dispatch(event) {
                self.apply(update);
            }
        }
        let range = self.binder.range();
        self.range_draft = [range.low(), range.high()];
    }

    fn apply(&mut self, update: ChartUpdate) {
        match update {
            ChartUpdate::Pie(pie) => self.pie = pie,
            ChartUpdate::Scatter(scatter) => self.scatter = scatter,
        }
    }

    /// Export both charts' data; failures end up in the status line.
    pub fn export_to(&mut self, path: &Path) {
        match export::write_json(&ChartSnapshot::capture(&self.binder), path) {
            Ok(()) => self.status_message = Some(format!("Exported to {}", path.display())),
            Err(e) => {
                log::error!("Failed to export chart data: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn state() -> AppState {
        AppState::new(Arc::new(sample_dataset()), 1000.0)
    }

    #[test]
    fn starts_on_all_sites_and_full_range() {
        let s = state();
        assert_eq!(s.site(), &SiteSelector::All);
        assert_eq!(s.range_draft, [0.0, 9600.0]);
        assert_eq!(s.scatter.points.len(), s.dataset().len());
        assert_eq!(s.pie.rows.len(), 3);
    }

    #[test]
    fn slider_bounds_cover_observed_range_in_whole_steps() {
        let s = state();
        assert_eq!(s.slider_bounds(), 0.0..=10000.0);
        let s = AppState::new(Arc::new(sample_dataset()), 2500.0);
        assert_eq!(s.slider_bounds(), 0.0..=10000.0);
    }

    #[test]
    fn slider_marks_split_extent_evenly() {
        let s = state();
        assert_eq!(s.slider_marks(), [0.0, 2500.0, 5000.0, 7500.0, 10000.0]);
    }

    #[test]
    fn site_search_is_case_insensitive_and_keeps_all() {
        let mut s = state();
        assert_eq!(s.filtered_site_options().len(), 4);

        s.site_filter = "  ks".to_string();
        assert_eq!(
            s.filtered_site_options(),
            [SiteSelector::All, SiteSelector::parse("KSC")]
        );

        s.site_filter = "Omelek".to_string();
        assert_eq!(s.filtered_site_options(), [SiteSelector::All]);
    }

    #[test]
    fn queued_events_apply_in_order_on_flush() {
        let mut s = state();
        s.select_site(SiteSelector::parse("VAFB"));
        s.select_site(SiteSelector::All);
        s.select_site(SiteSelector::parse("KSC"));
        assert_eq!(s.site(), &SiteSelector::All);

        s.flush_events();
        assert_eq!(s.site(), &SiteSelector::parse("KSC"));
        assert_eq!(s.pie.title, "Total successful launches in KSC");
        assert!(s.scatter.points.iter().all(|p| p.booster_version_category != "v1.0"));
    }

    #[test]
    fn range_edit_updates_scatter_only() {
        let mut s = state();
        let pie_before = s.pie.clone();
        s.range_draft = [2000.0, 3000.0];
        s.commit_range_draft(true);
        s.flush_events();
        assert_eq!(s.range(), PayloadRange::new(2000.0, 3000.0).unwrap());
        assert_eq!(s.scatter.points.len(), 3);
        assert_eq!(s.pie, pie_before);
    }

    #[test]
    fn crossed_range_handles_are_clamped() {
        let mut s = state();
        s.range_draft = [7000.0, 5000.0];
        s.commit_range_draft(true);
        s.flush_events();
        assert_eq!(s.range(), PayloadRange::new(5000.0, 5000.0).unwrap());

        s.range_draft = [5000.0, 1000.0];
        s.commit_range_draft(false);
        s.flush_events();
        assert_eq!(s.range(), PayloadRange::new(5000.0, 5000.0).unwrap());
        assert_eq!(s.range_draft, [5000.0, 5000.0]);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = state();
        s.select_site(SiteSelector::parse("VAFB"));
        s.range_draft = [100.0, 200.0];
        s.commit_range_draft(true);
        s.flush_events();

        s.reset();
        s.flush_events();
        assert_eq!(s.site(), &SiteSelector::All);
        assert_eq!(s.range_draft, [0.0, 9600.0]);
    }

    #[test]
    fn failed_export_sets_status() {
        let mut s = state();
        s.export_to(Path::new("/nonexistent/dir/out.json"));
        assert!(s.status_message.as_deref().unwrap_or("").starts_with("Error:"));
    }
}
