// Adapters layer: concrete trip sources that build a ledger from files.

pub mod csv_source;
pub mod json_source;

pub use csv_source::CsvTripSource;
pub use json_source::JsonTripSource;
