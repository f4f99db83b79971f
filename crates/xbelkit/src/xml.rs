//! XML event layer: the pull-source and sink contracts plus concrete implementations

pub mod buffer;
pub mod cursor;
pub mod event;
pub mod tokenizer;
pub mod writer;

pub use buffer::EventBuffer;
pub use cursor::Cursor;
pub use event::{Attributes, Event, EventSink, EventSource};
pub use tokenizer::Tokenizer;
pub use writer::XmlWriter;
