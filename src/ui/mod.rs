//! egui widgets for each view region.

pub mod panels;
pub mod plot;
pub mod table;
