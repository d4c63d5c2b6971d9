// Adapters layer: CSV in and out of the record model.

pub mod csv_export;
pub mod csv_source;
