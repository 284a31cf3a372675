pub mod connection;
pub mod mongo;

pub use connection::{ConnectionManager, ConnectionState, Connector, InFlightPolicy};
pub use mongo::{MongoBlogStore, MongoConnector};
