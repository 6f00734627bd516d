//! Indirect-object model used by the writer.
//!
//! These types describe a document the way it is laid out on disk: numbered
//! objects whose bodies are dictionaries, arrays, strings and streams.

mod dictionary;
mod primitive;
mod stream;

pub use dictionary::Dictionary;
pub use primitive::{Object, ObjectId};
pub use stream::Stream;
