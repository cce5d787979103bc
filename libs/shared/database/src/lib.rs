pub mod error;
pub mod memory;
pub mod store;
pub mod supabase;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use store::{Collection, Condition, Filter, FilterOp, FilterValue, RecordStore, StoreResult};
pub use supabase::{SupabaseClient, SupabaseStore};
