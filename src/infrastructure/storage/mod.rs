pub mod history_manager;
pub mod persistent_store;

pub use history_manager::HistoryManager;
pub use persistent_store::PersistentStore;
