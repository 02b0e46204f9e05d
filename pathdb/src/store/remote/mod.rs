//! Remote backend: the store contract on top of an external document
//! database reached through a [DocumentDriver].

mod database;
mod driver;
mod transaction;

pub use database::RemoteDatabase;
pub use driver::*;
pub use transaction::*;
