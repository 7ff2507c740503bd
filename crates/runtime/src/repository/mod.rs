//! Storage boundary: the document store contract, an in-memory
//! implementation and typed collections over it.

mod collections;
mod error;
mod memory;
mod traits;
mod typed;

pub use collections::{
    CHARACTERS, COOLDOWNS, PROGRESSION_CLOCKS, Repositories, SERVER_EVENTS, ServerEvent, clock_id,
};
pub use error::{Result, StoreError};
pub use memory::InMemoryDocumentStore;
pub use traits::{Document, DocumentStore, Fields, Filter};
pub use typed::{TypedCollection, Versioned};
