use thiserror::Error;

/// A page retrieval failure reported by a [`crate::PageSource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Pages are 1-based and must hold at least one item.
    #[error("invalid page request (page={page}, page_size={page_size})")]
    InvalidRequest { page: usize, page_size: usize },
    /// The backing store could not serve the page (I/O, timeout, ...).
    #[error("{0}")]
    Unavailable(String),
}

/// Failure to build a dataset from its source document.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("parse source JSON")]
    Json(#[from] serde_json::Error),
    #[error("read source")]
    Io(#[from] std::io::Error),
}
