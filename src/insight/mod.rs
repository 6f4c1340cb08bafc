pub mod client;
pub mod request;
pub mod slot;

pub use client::{Insight, InsightClient, InsightError};
pub use request::{InsightRequest, RankedEntry, TopEntry};
pub use slot::InsightSlot;
