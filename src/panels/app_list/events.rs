//! App list event definitions and broadcast event bus.

use crate::event_bus::CHANNEL_CAPACITY;
use crate::view_model::{AppFilter, Counts, Notice};
use std::sync::OnceLock;
use tokio::sync::broadcast::{self, Receiver, Sender};

/// Events from the view model to the front-end.
#[derive(Clone, Debug, PartialEq)]
pub enum DeckEvent {
    InventoryLoaded(Counts),
    FilterChanged(AppFilter),
    Notice(Notice),
}

// Static broadcast sender - subscribers get their own receiver via subscribe()
static DECK_SENDER: OnceLock<Sender<DeckEvent>> = OnceLock::new();

fn get_sender() -> &'static Sender<DeckEvent> {
    DECK_SENDER.get_or_init(|| {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        tx
    })
}

/// Send an event to all subscribers. Non-blocking.
/// If no receivers, the event is dropped (expected during startup).
#[inline]
pub fn send(event: DeckEvent) {
    let _ = get_sender().send(event);
}

/// Send a user notice.
#[inline]
pub fn send_notice(notice: Notice) {
    send(DeckEvent::Notice(notice));
}

/// Subscribe to the event bus.
pub fn subscribe() -> Receiver<DeckEvent> {
    get_sender().subscribe()
}

/// Drain all pending events from a receiver, in order.
/// Handles RecvError::Lagged by continuing to drain.
pub fn drain(rx: &mut Receiver<DeckEvent>) -> Vec<DeckEvent> {
    let mut events = Vec::new();

    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Empty) => break,
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(broadcast::error::TryRecvError::Closed) => break,
        }
    }

    events
}
