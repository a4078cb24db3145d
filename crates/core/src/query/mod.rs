//! Query engine over merged asset sets.

mod cursor;
mod engine;
mod filter;
mod page;

pub use cursor::{decode_cursor, encode_cursor, CursorError};
pub use engine::{apply_filters, paginate, run_query, sort_records};
pub use filter::{QueryFilter, SortKey, SortOrder, TimePeriod, DEFAULT_PAGE_SIZE};
pub use page::{Page, PageInfo};
