//! Public market data endpoints
//!
//! These endpoints need no credentials. They are signed only when
//! [`ClientOptions::sign_public_requests`](crate::ClientOptions) is set.

pub mod quotes;
pub mod reference;
