mod model;
mod repository;

pub use model::{BlobQuote, StoreBlob, STORE_BLOB_VERSION};
pub use repository::SqliteQuoteStore;
