pub mod cache;
pub mod corpus;
mod error;
pub mod highlight;
pub mod loader;
pub mod reader;
pub mod settings;
pub mod source;
mod utils;

pub use cache::{CacheEnvelope, KeyValueCache, MemoryKvStore, SqliteKvStore};
pub use corpus::{flatten, Coordinate, Corpus, FlatNode, Item, Section, SectionLayout};
pub use error::LoadError;
pub use highlight::{HighlightEvent, HighlightOrigin, HighlightScheduler, HighlightState};
pub use loader::{ContentLoader, LoadResult, LoadStatus, LoaderConfig};
pub use reader::{Reader, RowKind, RowView};
pub use settings::{ReaderSettings, SettingsStore};
pub use source::{HttpSource, RemoteSource};
pub use utils::init_logging;
