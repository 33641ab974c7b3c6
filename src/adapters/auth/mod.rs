//! Authentication adapters.
//!
//! Implementations of the `TokenValidator` port:
//!
//! - `jwt` - HS256 bearer tokens signed with a shared secret
//! - `mock` - Fixed token table for tests

mod jwt;
mod mock;

pub use jwt::{JwtConfig, JwtTokenValidator};
pub use mock::MockTokenValidator;
