pub mod error;
pub mod loader;
pub mod types;

pub use error::LoadError;
pub use loader::{CatalogueLoader, COLUMN_COUNT};
pub use types::{Catalogue, CountryRecord, DuplicateNotice, Indicator};
