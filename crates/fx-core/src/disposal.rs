//! Teardown registry.
//!
//! Every listener, observer, frame callback and GPU allocation that an
//! instance creates registers its teardown here. [`Disposer::dispose`] runs
//! each one exactly once; later calls are no-ops.

use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Listener,
    Observer,
    Frame,
    Gpu,
}

struct Entry {
    kind: ResourceKind,
    label: &'static str,
    teardown: Box<dyn FnOnce()>,
}

#[derive(Default)]
pub struct Disposer {
    entries: SmallVec<[Entry; 8]>,
    disposed: bool,
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposer")
            .field("entries", &self.entries.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl Disposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registration arriving after disposal is torn down immediately.
    pub fn register(
        &mut self,
        kind: ResourceKind,
        label: &'static str,
        teardown: impl FnOnce() + 'static,
    ) {
        if self.disposed {
            log::debug!("[dispose] late {:?} '{}' released immediately", kind, label);
            teardown();
            return;
        }
        self.entries.push(Entry {
            kind,
            label,
            teardown: Box::new(teardown),
        });
    }

    pub fn active(&self, kind: ResourceKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn total_active(&self) -> usize {
        self.entries.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Runs teardowns in reverse registration order.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        while let Some(entry) = self.entries.pop() {
            log::debug!("[dispose] {:?} '{}'", entry.kind, entry.label);
            (entry.teardown)();
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}
