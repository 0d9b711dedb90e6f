//! Streaming EML reading.
//!
//! [`EmlReader`] tokenizes a document with quick-xml and emits one
//! [`EmlEvent`](crate::registry::EmlEvent) per record boundary. The helpers
//! in [`utils`] turn element names and attributes into record keys.

mod reader;
mod utils;

pub use reader::EmlReader;
pub use utils::{attribute_key, element_attributes, local_name, ElementAttribute};
