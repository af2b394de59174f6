//! Song catalog: records, filters, partial updates and their storage.

mod changes;
pub mod date;
mod field;
mod filter;
mod service;
mod sqlite_store;
mod store;
mod types;

pub use changes::{Assignment, Mutation, SongChanges};
pub use field::{FieldError, FieldValue, SongField};
pub use filter::{Constraint, Predicate, SongFilter};
pub use service::SongService;
pub use sqlite_store::SqliteSongStore;
pub use store::{SongError, SongStore};
pub use types::{Song, SongPage};
