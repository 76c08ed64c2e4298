//! sea-orm entities backing the `books` and `notes` tables.

pub mod book;
pub mod note;

pub use book::ReadingStatus;
