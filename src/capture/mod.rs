pub mod aggregate;

pub use aggregate::{aggregate_directory, read_capture, run, write_summary, Aggregator};
