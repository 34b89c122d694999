//! Interception of the host's channel-creation entry point.
//!
//! Application code keeps calling the creation API it already uses; every
//! channel created through the wrapped factory is also appended to the
//! batch's registry, so the server renderer discovers every channel in use
//! without a manual registration step per channel. Nothing process-wide is
//! mutated: the wrapper is an explicit value the application threads to its
//! creation sites.

use std::any::Any;
use std::rc::Rc;
use tracing::debug;

use crate::host::{AmbientValue, ChannelFactory, ChannelHandle};
use crate::registry::RegistryHandle;

/// A channel factory that registers everything it creates.
pub struct TrackingFactory<N> {
    inner: Rc<dyn ChannelFactory<N>>,
    registry: RegistryHandle<N>,
}

impl<N: 'static> TrackingFactory<N> {
    /// Wrap `factory` so created channels land in `registry`.
    ///
    /// Idempotent: passing an already-tracking factory returns it unchanged,
    /// so repeated installation cannot stack wrappers or change the entry
    /// point's identity.
    pub fn install(
        factory: Rc<dyn ChannelFactory<N>>,
        registry: &RegistryHandle<N>,
    ) -> Rc<dyn ChannelFactory<N>> {
        if factory.as_any().is::<TrackingFactory<N>>() {
            debug!("Channel factory already tracking; leaving it unchanged");
            return factory;
        }
        Rc::new(TrackingFactory {
            inner: factory,
            registry: registry.clone(),
        })
    }
}

impl<N: 'static> ChannelFactory<N> for TrackingFactory<N> {
    fn create(&self, default: AmbientValue) -> ChannelHandle<N> {
        let handle = self.inner.create(default);
        self.registry.register(Rc::clone(&handle));
        debug!("Created ambient channel through tracking factory");
        handle
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
