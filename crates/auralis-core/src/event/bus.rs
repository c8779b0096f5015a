// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A generic, thread-safe event channel.
///
/// Platform glue publishes from whichever thread delivers the callback; the
/// frame loop is the only consumer and drains the queue once per outer
/// iteration, either without blocking or by parking until the first event
/// arrives.
#[derive(Debug)]
pub struct EventBus<T: Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Send + 'static> EventBus<T> {
    /// Creates a new EventBus with an unbounded channel.
    ///
    /// ## Returns
    /// A new instance of the EventBus struct.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("EventBus initialized.");
        Self { sender, receiver }
    }

    /// Sends an event, logging an error if the receiver is disconnected.
    ///
    /// ## Arguments
    /// * `event` - The event to be sent over the channel.
    pub fn publish(&self, event: T) {
        log::trace!("Publishing an event.");

        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to send event: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a clone of the sender end of the channel.
    ///
    /// ## Returns
    /// A sender that other threads can publish through.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Collects every pending event without blocking.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Blocks until one event is available, then collects it together with
    /// everything else already queued.
    ///
    /// ## Returns
    /// The received events. The bus keeps a sender of its own, so this only
    /// returns once something has been published.
    pub fn wait_and_drain(&self) -> Vec<T> {
        match self.receiver.recv() {
            Ok(first) => {
                let mut events = vec![first];
                events.extend(self.receiver.try_iter());
                events
            }
            Err(_) => Vec::new(),
        }
    }
}

impl<T: Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Ping(u32),
        Stop,
    }

    #[test]
    fn drain_returns_events_in_order() {
        let bus = EventBus::new();
        bus.publish(TestEvent::Ping(1));
        bus.publish(TestEvent::Ping(2));
        bus.publish(TestEvent::Stop);
        assert_eq!(
            bus.drain(),
            vec![TestEvent::Ping(1), TestEvent::Ping(2), TestEvent::Stop]
        );
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn sender_clone_publishes_from_another_thread() {
        let bus = EventBus::new();
        let sender = bus.sender();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            sender.send(TestEvent::Ping(7)).ok();
            sender.send(TestEvent::Ping(8)).ok();
        });

        let first = bus.wait_and_drain();
        handle.join().ok();
        let mut all = first;
        all.extend(bus.drain());
        assert_eq!(all, vec![TestEvent::Ping(7), TestEvent::Ping(8)]);
    }

    #[test]
    fn wait_and_drain_returns_immediately_when_queue_has_data() {
        let bus = EventBus::new();
        bus.publish(TestEvent::Stop);
        assert_eq!(bus.wait_and_drain(), vec![TestEvent::Stop]);
    }
}
