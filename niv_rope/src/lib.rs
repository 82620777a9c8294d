mod config;
mod error;
mod leaf;
mod len_pair;
mod node;
mod query;
mod rle;
mod rope;

pub use config::RopeConfig;
pub use error::{RopeError, RopeResult};
pub use leaf::LeafNode;
pub use len_pair::LenPair;
pub use query::{QueryResult, QueryStep};
pub use rle::RLEGroup;
pub use rope::SumRope;
