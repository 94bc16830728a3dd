pub mod clock;
pub mod config;
pub mod content_loader;
pub mod result;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LoaderConfig, DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT, DEFAULT_SOURCE_URL};
pub use content_loader::ContentLoader;
pub use result::{LoadResult, LoadSnapshot, LoadStatus};
