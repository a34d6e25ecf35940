use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Outcome, SiteSelector};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Booster category → Color32
// ---------------------------------------------------------------------------

/// Maps each booster version category to a distinct colour. Built once from
/// the whole dataset so a category keeps its colour while filters change.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CategoryColors {
    pub fn new(categories: &BTreeSet<String>) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories.iter().cloned().zip(palette).collect();

        CategoryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Pie slice colours
// ---------------------------------------------------------------------------

pub const FAILURE_COLOR: Color32 = Color32::from_rgb(214, 69, 65);
pub const SUCCESS_COLOR: Color32 = Color32::from_rgb(76, 175, 80);

pub fn outcome_color(outcome: Outcome) -> Color32 {
    match outcome {
        Outcome::Failure => FAILURE_COLOR,
        Outcome::Success => SUCCESS_COLOR,
    }
}

/// Colours for proportion chart slices: one per site in the all-sites view,
/// one per outcome in the single-site view. A slice keeps its colour when
/// other slices come and go.
#[derive(Debug, Clone)]
pub struct SliceColors {
    by_site: BTreeMap<String, Color32>,
}

impl SliceColors {
    /// `sites` in first-seen order, so palette positions follow the site control.
    pub fn new(sites: &[String]) -> Self {
        let palette = generate_palette(sites.len());
        SliceColors {
            by_site: sites.iter().cloned().zip(palette).collect(),
        }
    }

    /// Colour for an aggregate row's `group_key` under the current selector.
    pub fn color_for(&self, site: &SiteSelector, group_key: &str) -> Color32 {
        match site {
            SiteSelector::All => self.by_site.get(group_key).copied(),
            SiteSelector::Site(_) => group_key
                .parse::<f64>()
                .ok()
                .and_then(Outcome::from_class)
                .map(outcome_color),
        }
        .unwrap_or(Color32::GRAY)
    }
}
