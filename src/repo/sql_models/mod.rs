mod tweet_record;
pub use tweet_record::*;

mod pg_queries;
pub use pg_queries::*;
