pub mod locks;
pub mod state;
pub mod test_utils;
pub mod validation;

pub use locks::KeyedLocks;
pub use state::AppState;
