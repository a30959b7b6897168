pub mod drug_info;

pub use drug_info::SqliteKnowledgeStore;
