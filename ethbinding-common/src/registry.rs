//! Lookup table from event signature topics to ABI event descriptors.

use crate::abi::Event;
use crate::Abi;
use std::collections::HashMap;
use web3::types::H256;

/// An immutable mapping from a 32-byte event signature hash to the ABI event
/// it identifies.
#[derive(Clone, Debug, Default)]
pub struct EventRegistry {
    events: HashMap<H256, Event>,
}

impl EventRegistry {
    /// Creates a registry containing every event declared in a contract ABI.
    pub fn from_abi(abi: &Abi) -> Self {
        EventRegistry::from_events(abi.events().cloned())
    }

    /// Creates a registry from event descriptors. When two events share a
    /// signature the last one wins.
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event>,
    {
        EventRegistry {
            events: events
                .into_iter()
                .map(|event| (event.signature(), event))
                .collect(),
        }
    }

    /// Retrieves the event with the specified signature topic.
    pub fn get(&self, signature: &H256) -> Option<&Event> {
        self.events.get(signature)
    }

    /// Returns the number of registered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events are registered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over the registered signatures and events in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&H256, &Event)> {
        self.events.iter()
    }
}
