/// Data layer: core types, loading, filtering and chart-series builders.
///
/// Architecture:
/// ```text
///  .csv / .json / built-in sample
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  validated column registry, immutable rows
///   └──────────┘
///        │
///        ├──► filter  – threshold predicates + protocol selection
///        ├──► series  – bar values, pie counts, heatmap matrix
///        └──► polar   – closed radar-chart polygons
/// ```
///
/// Nothing in here knows about egui; the UI layer consumes these outputs.

pub mod filter;
pub mod loader;
pub mod model;
pub mod polar;
pub mod series;
