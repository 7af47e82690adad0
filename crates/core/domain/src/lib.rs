pub mod status;
pub mod time;

pub use status::{ParseStoreStatusError, StoreStatus};
pub use time::{format_iso8601, format_local, now_epoch_ms};
