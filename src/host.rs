//! Fixed contract consumed from the host UI framework.
//!
//! The boundary renders nothing itself; everything it emits goes through one
//! of these capabilities. A host implements them once, next to its element
//! type, and the boundary stays agnostic of how rendering actually works.
//! Render trees own non-`Send` closures, so the whole pathway is
//! single-threaded by construction.

use std::any::Any;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::SubtreeFailure;

/// Type-erased value carried on an ambient channel. Channels agree on the
/// concrete type out of band; the boundary only moves values around.
pub type AmbientValue = Rc<dyn Any>;

/// Values visible on named legacy channels at a tree position.
pub type LegacyValues = BTreeMap<String, AmbientValue>;

/// Marker/validator for one legacy channel value.
pub type LegacyValidator = fn(&AmbientValue) -> bool;

/// Declares which named legacy channels a subtree reads.
pub type LegacyContextTypes = BTreeMap<String, LegacyValidator>;

/// Continuation a consumer frame invokes with the value it read.
pub type ReadAmbient<N> = Box<dyn FnOnce(AmbientValue) -> N>;

/// Shared handle to one ambient channel. Identity (allocation pointer)
/// distinguishes channels created by separate creation calls.
pub type ChannelHandle<N> = Rc<dyn AmbientChannel<N>>;

/// Core host capabilities the boundary delegates to.
pub trait Host {
    /// Host render-tree node.
    type Node;

    /// Serialize `node` in an isolated, synchronous render pass. Must fail,
    /// rather than panic or emit partial output, when any descendant's
    /// render logic fails.
    fn render_to_static_markup(&self, node: Self::Node) -> Result<String, SubtreeFailure>;

    /// Block container whose inner content is `html`, injected verbatim
    /// with no further escaping.
    fn raw_container(&self, html: String) -> Self::Node;

    /// Node that renders to nothing.
    fn empty(&self) -> Self::Node;

    /// Re-establish named legacy values for descendants of `child`.
    fn provide_legacy(&self, values: LegacyValues, child: Self::Node) -> Self::Node;
}

/// One ambient context channel, as created by the host framework.
pub trait AmbientChannel<N> {
    /// Consumer frame: when the host's render pass reaches it, `then` runs
    /// exactly once with the value visible at that position (the channel
    /// default when no ancestor provides one).
    fn read(&self, then: ReadAmbient<N>) -> N;

    /// Provider frame re-establishing `value` for everything under `child`.
    fn write(&self, value: AmbientValue, child: N) -> N;
}

/// The host framework's channel-creation entry point.
pub trait ChannelFactory<N> {
    fn create(&self, default: AmbientValue) -> ChannelHandle<N>;

    /// Identity escape hatch so an interception layer can recognize a
    /// factory it already wrapped.
    fn as_any(&self) -> &dyn Any;
}
