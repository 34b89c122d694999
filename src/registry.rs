//! Registry of ambient channels the server renderer must propagate.
//!
//! One registry per render batch, owned by the caller that drives the batch
//! and shared with the tracking factory through a cheap `RegistryHandle`
//! clone. Registration order is preserved; propagation nests in that order.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use crate::host::ChannelHandle;

/// Ordered sequence of ambient channel handles. Grows by registration,
/// shrinks only by `clear`.
pub struct ContextRegistry<N> {
    channels: Vec<ChannelHandle<N>>,
}

impl<N> ContextRegistry<N> {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Append `handle` unless the same channel is already registered.
    pub fn register(&mut self, handle: ChannelHandle<N>) {
        if self.channels.iter().any(|known| same_channel(known, &handle)) {
            debug!("Ambient channel already registered; keeping first registration");
            return;
        }
        self.channels.push(handle);
        debug!(total = self.channels.len(), "Registered ambient channel");
    }

    /// Drop every registration. Only between independent render batches,
    /// never while a render is in flight.
    pub fn clear(&mut self) {
        self.channels.clear();
        debug!("Cleared ambient channel registry");
    }

    /// Registered channels, in registration order.
    pub fn all(&self) -> &[ChannelHandle<N>] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl<N> Default for ContextRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared view of one batch's registry. Render passes are serialized by the
/// host's execution model, so interior mutability needs no lock.
pub struct RegistryHandle<N>(Rc<RefCell<ContextRegistry<N>>>);

impl<N> Clone for RegistryHandle<N> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<N> RegistryHandle<N> {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(ContextRegistry::new())))
    }

    /// Mark an ambient channel for propagation through the pre-render.
    pub fn register(&self, handle: ChannelHandle<N>) {
        self.0.borrow_mut().register(handle);
    }

    /// Reset the registry between render batches.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Ordered copy of the registered handles, safe to hold across a render.
    pub fn snapshot(&self) -> Vec<ChannelHandle<N>> {
        self.0.borrow().all().to_vec()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl<N> Default for RegistryHandle<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Channels are compared by allocation, not by contents: every creation
/// call yields a distinct identity.
fn same_channel<N>(a: &ChannelHandle<N>, b: &ChannelHandle<N>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}
