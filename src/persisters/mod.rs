pub mod in_memory;
pub mod persister;
#[cfg(feature = "postgres")]
pub mod postgres;
