//! Query functions over the postgres schema. Every function accepts any
//! executor (pool, connection or transaction) so callers decide the scope.

mod tweet;
pub use tweet::*;
