//! The two [`TaskStore`](crate::traits::TaskStore) implementations: the real remote one and an
//! in-memory one for tests and demos

pub mod memory;
pub mod remote;

pub use memory::MemoryStore;
pub use memory::MockBehaviour;
pub use remote::RemoteStore;
