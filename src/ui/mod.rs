//! egui presentation layer: panels (menus, filters) and chart views.

pub mod charts;
pub mod panels;
