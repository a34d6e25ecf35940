//! egui widgets: the control panels and the two charts.

pub mod panels;
pub mod plot;
