pub mod flatten;
pub mod layout;
pub mod model;

pub use flatten::{flatten, position_of, FlatNode};
pub use layout::{Coordinate, SectionLayout};
pub use model::{Corpus, Item, Section};
