pub mod error;
pub use error::Result;
pub use error::Error;

pub mod metadb;
pub use metadb::MetaDB;
pub use metadb::RegistryQuery;

pub mod config;
pub use config::Config;

pub mod relationship_graph;
pub use relationship_graph::RelationshipTree;
