//! The roster core: repository, natural-key merge, and the import/export
//! formats (world JSON, user JSON, channel JSON, denormalized CSV).

pub mod csv_io;
pub mod error;
pub mod export;
pub mod import;
pub mod json;
pub mod merge;
pub mod repository;

pub use error::{ExportError, ImportError, RepositoryError};
pub use export::ExportKind;
pub use import::{ImportFormat, ImportPayload, parse_import};
pub use repository::{CHANNELS_KEY, ImportSummary, Repository, USERS_KEY};
