//! In-memory event recorder

use std::collections::VecDeque;
use std::convert::Infallible;

use crate::error::Result;
use crate::xml::event::{Event, EventSink, EventSource};

/// Records sink calls as [`Event`]s and replays them as an [`EventSource`]
///
/// Replay hands events out exactly as recorded, so hand-built buffers can
/// describe streams a tokenizer would never produce (unbalanced end tags,
/// truncated documents).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventBuffer {
    events: VecDeque<Event>,
    finished: bool,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            finished: false,
        }
    }

    /// Events not yet replayed
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events.into()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventBuffer {
    type Error = Infallible;

    fn write_start_element(&mut self, name: &str) -> std::result::Result<(), Infallible> {
        self.events.push_back(Event::start(name));
        Ok(())
    }

    /// Attaches to the preceding start element; ignored anywhere else
    fn write_attribute(&mut self, name: &str, value: &str) -> std::result::Result<(), Infallible> {
        if let Some(Event::StartElement { attributes, .. }) = self.events.back_mut() {
            attributes.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn write_characters(&mut self, text: &str) -> std::result::Result<(), Infallible> {
        self.events.push_back(Event::text(text));
        Ok(())
    }

    fn write_end_element(&mut self) -> std::result::Result<(), Infallible> {
        self.events.push_back(Event::EndElement);
        Ok(())
    }
}

impl EventSource for EventBuffer {
    fn next_event(&mut self) -> Result<Event> {
        match self.events.pop_front() {
            Some(Event::EndOfInput) | None => {
                self.finished = true;
                Ok(Event::EndOfInput)
            }
            Some(event) => Ok(event),
        }
    }

    fn at_end(&self) -> bool {
        self.finished
    }
}
