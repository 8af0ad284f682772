// src/i18n/mod.rs  —  Flat UI string catalog, resource parser, change subscribers
pub mod catalog;
pub mod parser;
pub mod subscribers;

pub use catalog::LocalizationCatalog;
pub use parser::{parse, StringTable};
pub use subscribers::{Subscriber, SubscriberRegistry};
