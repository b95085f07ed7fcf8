pub mod analysis;
pub mod catalog;
pub mod server;

pub use catalog::{InsightKind, MessageContext, TimeContext, Tone};
