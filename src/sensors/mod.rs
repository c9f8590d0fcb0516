pub mod memory;
pub mod store;
pub mod validate;

pub use memory::MemoryReadingStore;
pub use store::{Page, PgReadingStore, ReadingStore, SharedStore, StoreError};
