//! Uploaded portfolio files.

mod csv;

pub use self::csv::{parse_holdings, read_holdings};
