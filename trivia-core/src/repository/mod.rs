mod error;
pub mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryStore, MemoryLocalStore, Operation};
pub use traits::{
    CategoryStore, ContentStore, ItemQuery, LocalSettingsStore, SupportStore, UserStore,
};

#[cfg(test)]
pub use traits::{MockContentStore, MockSupportStore, MockUserStore};
