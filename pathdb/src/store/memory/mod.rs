mod database;
mod group;
mod transaction;
mod tree;

pub use database::*;
pub use group::*;
pub use transaction::*;
pub use tree::*;
