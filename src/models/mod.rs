pub mod item;
pub mod quotation;
pub mod report;

pub use item::{normalize_ncm, ItemCatalog, ItemRecord};
pub use quotation::{clean_text, parse_decimal, QuotationColumns, QuotationRow, FACTOR_COLUMNS};
pub use report::{AuditEntry, IncompleteRow, RowStatus, UnmatchedItem};
