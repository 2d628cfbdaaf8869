use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Weak};

use super::FileId;

/// A change applied to the document table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Created(FileId),
    Updated(FileId),
    Deleted(FileId),
}

impl StoreEvent {
    pub const fn file_id(self) -> FileId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => id,
        }
    }
}

/// Which events a subscriber wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Every change to the table.
    All,
    /// Changes to a single document.
    File(FileId),
}

impl Query {
    pub fn matches(self, event: StoreEvent) -> bool {
        match self {
            Self::All => true,
            Self::File(id) => event.file_id() == id,
        }
    }
}

/// Receiving end of a subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    query: Query,
    rx: Receiver<StoreEvent>,
    _alive: Arc<()>,
}

impl Subscription {
    pub const fn query(&self) -> Query {
        self.query
    }

    /// Take every event delivered since the last call.
    pub fn drain(&self) -> Vec<StoreEvent> {
        self.rx.try_iter().collect()
    }
}

/// Registry of live subscriptions, shared by the store backends.
#[derive(Debug, Default)]
pub struct Subscribers {
    entries: Vec<Entry>,
}

#[derive(Debug)]
struct Entry {
    query: Query,
    tx: Sender<StoreEvent>,
    alive: Weak<()>,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.alive.strong_count() > 0
    }
}

impl Subscribers {
    pub fn subscribe(&mut self, query: Query) -> Subscription {
        self.prune();
        let (tx, rx) = mpsc::channel();
        let alive = Arc::new(());
        self.entries.push(Entry {
            query,
            tx,
            alive: Arc::downgrade(&alive),
        });
        Subscription {
            query,
            rx,
            _alive: alive,
        }
    }

    /// Deliver `event` to matching subscribers, pruning every dropped one.
    pub fn emit(&mut self, event: StoreEvent) {
        self.entries.retain(|entry| {
            entry.is_live() && (!entry.query.matches(event) || entry.tx.send(event).is_ok())
        });
    }

    fn prune(&mut self) {
        self.entries.retain(Entry::is_live);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
