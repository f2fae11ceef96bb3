/// Export backends: colour PNG, ramp legend, false-colour height maps and JSON.
pub mod height_map;
pub mod json;
pub mod png;

pub use height_map::{export_height_map, export_octave_maps};
pub use json::export_json;
pub use png::{export_legend_png, export_png};
