//! Observation runtime: transactional writes and change notification.
//!
//! A [`Runtime`] is an explicit capability handed to every store and field at
//! construction. All writes to observable slots go through
//! [`Runtime::transaction`]; listeners registered with
//! [`Runtime::subscribe`] see each outermost transaction as one
//! [`ChangeBatch`], never an intermediate state.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

type Listener = Rc<dyn Fn(&ChangeBatch)>;

/// What happened to an observable slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// A field value was written.
    Value,
    /// An entity array's contents were replaced.
    Replace {
        /// Length of the array after the replacement.
        len: usize,
    },
}

/// One recorded write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    /// Entity owning the slot, when known.
    pub entity: Option<Arc<str>>,
    /// Field or entry name of the slot.
    pub field: Arc<str>,
    /// Kind of write.
    pub kind: ChangeKind,
}

/// All changes committed by one outermost transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    /// Runtime revision after this batch.
    pub revision: u64,
    /// Changes in the order they were made.
    pub changes: Vec<Change>,
}

impl ChangeBatch {
    /// Returns true if any change touched the named field.
    #[must_use]
    pub fn touches(&self, field: &str) -> bool {
        self.changes.iter().any(|c| &*c.field == field)
    }
}

#[derive(Default)]
struct RuntimeInner {
    depth: Cell<u32>,
    revision: Cell<u64>,
    next_listener: Cell<u64>,
    pending: RefCell<Vec<Change>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
}

/// Shared single-threaded handle to the observation runtime.
///
/// Cloning is cheap; clones refer to the same runtime.
#[derive(Clone, Default)]
pub struct Runtime(Rc<RuntimeInner>);

impl Runtime {
    /// Creates a new runtime with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` as one transaction.
    ///
    /// Nested calls join the outermost transaction. Listeners are notified
    /// once, after the outermost transaction returns, with every change
    /// recorded inside it.
    pub fn transaction<R>(&self, f: impl FnOnce() -> R) -> R {
        self.0.depth.set(self.0.depth.get() + 1);
        let _guard = TransactionGuard(self);
        f()
    }

    /// Returns true while a transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.0.depth.get() > 0
    }

    /// Number of batches committed so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.0.revision.get()
    }

    /// Registers a change listener.
    ///
    /// The listener stays registered until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&ChangeBatch) + 'static) -> Subscription {
        let id = self.0.next_listener.get();
        self.0.next_listener.set(id + 1);
        self.0.listeners.borrow_mut().push((id, Rc::new(listener)));
        Subscription {
            runtime: Rc::downgrade(&self.0),
            id,
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.0.listeners.borrow().len()
    }

    /// Returns true if both handles refer to the same runtime.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Records a change. Outside a transaction it is committed immediately.
    pub(crate) fn record(&self, change: Change) {
        self.0.pending.borrow_mut().push(change);
        if !self.in_transaction() {
            self.commit();
        }
    }

    fn commit(&self) {
        let changes = std::mem::take(&mut *self.0.pending.borrow_mut());
        if changes.is_empty() {
            return;
        }

        let revision = self.0.revision.get() + 1;
        self.0.revision.set(revision);
        tracing::trace!(revision, changes = changes.len(), "committing change batch");

        let batch = ChangeBatch { revision, changes };
        // Listeners may subscribe, unsubscribe, or write while being notified.
        let listeners: Vec<Listener> = self
            .0
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&batch);
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("depth", &self.0.depth.get())
            .field("revision", &self.0.revision.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

struct TransactionGuard<'a>(&'a Runtime);

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        let inner = &self.0.0;
        let depth = inner.depth.get() - 1;
        inner.depth.set(depth);
        if depth == 0 {
            if std::thread::panicking() {
                inner.pending.borrow_mut().clear();
            } else {
                self.0.commit();
            }
        }
    }
}

/// Handle keeping a listener registered.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    runtime: Weak<RuntimeInner>,
    id: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.runtime.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
