//! # Facade Module
//!
//! This module implements the **Facade** pattern, serving as an intermediate logic layer
//! between the application's public interface and the backing systems.
//!
//! * **Store Abstraction:** Facades reach the repository, the cache, the object store
//!   and the notification broker only through the capabilities in [`crate::traits`].
//! * **Coordinated Logic:** They sequence multi-step operations, such as an image swap
//!   that spans the object store and the repository, and decide which failures are fatal.
//! * **Encapsulation:** The rest of the system calls high level use cases on
//!   [`FacadeTweet`] rather than manipulating raw database models.

mod facade_error;
pub use facade_error::*;

mod outcome;
pub use outcome::*;

mod facade_tweet;
pub use facade_tweet::*;
