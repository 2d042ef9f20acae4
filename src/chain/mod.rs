//! Option chain export ingestion
//!
//! Turns the delayed-quote text export into aligned per-contract arrays:
//! calendar lookups, the line/field parser, and the immutable snapshot type
//! the rest of the crate consumes.

pub mod calendar;
pub mod parser;
pub mod snapshot;

pub use calendar::month_day_offset;
pub use parser::{parse_option_chain, ChainParseError};
pub use snapshot::OptionChainSnapshot;
