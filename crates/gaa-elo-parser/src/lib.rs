pub mod common;
pub mod errors;
pub mod frame;
pub mod model;
mod workbook;

pub use errors::WorkbookError;
pub use frame::{build_frame, date_from_epoch_days, days_since_epoch, ColumnKind};
pub use model::{is_placeholder_header, placeholder_header, Cell, RawSheet};
pub use workbook::{content_hash, MemoryWorkbook, SheetSource, Workbook};
