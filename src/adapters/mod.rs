// Adapters layer: concrete implementations of the domain ports (disk, http, workbooks, postgres).

pub mod http;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod storage;
pub mod xlsx;
