mod aggregate;
mod index;
mod store;
mod types;

pub use aggregate::{aggregate, EngineConfig, FAVORITE_TAGS_GROUP};
pub use index::{DocumentIndex, StaticIndex};
pub use store::{SubscriberId, TagMenuStore};
pub use types::{NavigationEntry, NoteHandle, SubEntry, TagMenuState};
