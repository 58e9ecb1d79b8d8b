//! Exchange endpoint implementations for the Huobi API
//!
//! This module provides signed methods for account management, order
//! placement and cancellation, deposits and withdrawals, and margin loans.
//! All of them need credentials on the [`Client`](crate::Client).

pub mod account;
pub mod cancel;
pub mod margin;
pub mod orders;
pub mod wallet;
