//! Caching layer.
//!
//! [`redis::RedisClient`] provides JSON read-through caching for documents
//! read on nearly every request (the authenticated user, program details).
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # default
//! ```

pub mod redis;
