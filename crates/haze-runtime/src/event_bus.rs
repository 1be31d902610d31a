//! Event queue between host callbacks and the activation machine

use crate::event::HostEvent;

/// A simple FIFO that host callbacks push to and the machine drains.
///
/// Host callbacks can arrive while the machine is busy applying a previous
/// one; queuing keeps the single-writer rule without re-entrancy.
pub struct EventBus {
    events: Vec<HostEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: HostEvent) {
        self.events.push(event);
    }

    /// Drain all events in arrival order
    pub fn drain(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenDescriptor;

    #[test]
    fn test_push_and_drain() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.push(HostEvent::ScreenActivated(ScreenDescriptor::new("main")));
        bus.push(HostEvent::PlayerStarted);

        assert_eq!(bus.len(), 2);

        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                HostEvent::ScreenActivated(ScreenDescriptor::new("main")),
                HostEvent::PlayerStarted,
            ]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn test_drain_clears() {
        let mut bus = EventBus::new();
        bus.push(HostEvent::PlayerStopped);

        let _ = bus.drain();
        assert!(bus.drain().is_empty());
    }
}
