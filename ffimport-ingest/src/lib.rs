//! ffimport-ingest: statement CSV reading and row normalization (no network).

pub mod amount;
pub mod columns;
pub mod date;
pub mod normalize;
pub mod statement;
pub mod types;

pub use amount::{AmountRangeError, parse_amount, split_sign};
pub use date::{DateParseError, parse_date};
pub use normalize::{Normalized, normalize_row, truncate_chars};
pub use statement::{Statement, StatementError};
pub use types::{DateOrder, Direction, NormalizeOptions, NormalizedRow, RawRow, SignConvention};
