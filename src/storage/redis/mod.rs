//! Redis-backed rate-limit storage
//!
//! ## Module Structure
//!
//! - `pool` - Connection setup, health check and URL sanitising
//! - `store` - [`RateLimitStore`](super::RateLimitStore) implementation
//! - `tests` - Module tests

mod pool;
mod store;

pub use pool::RedisPool;
pub use store::RedisStore;
