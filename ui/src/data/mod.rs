pub mod aggregate;
pub mod parse;
pub mod record;
pub mod source;

pub use aggregate::{available_drugs, default_selection, monthly_rows, MonthlyCounts};
pub use parse::parse_dataset;
pub use record::Record;
