//! Context bridge between the boundary's tree position and the isolated
//! pre-render.
//!
//! The pre-render runs outside the live tree position, so ambient values an
//! ancestor provides would normally be invisible to it. `capture` builds a
//! stack of consumer frames that the host's ongoing render pass evaluates
//! *at the boundary's position*, collecting the value each registered
//! channel currently carries; the continuation then wraps the subtree in a
//! matching stack of provider frames (`reestablish`) so the isolated pass
//! observes the captured values instead of channel defaults.
//!
//! The bridge itself never fails; whatever the supplied render functions
//! produce or raise propagates untouched.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use crate::host::{AmbientValue, ChannelHandle};

/// Continuation receiving the captured values, one per channel, in
/// registration order.
pub type CaptureInner<N> = Box<dyn FnOnce(Vec<AmbientValue>) -> N>;

/// Build the read half of the bridge: one consumer frame per channel, the
/// first-registered channel outermost, `inner` invoked once every read has
/// fired. An empty channel list degenerates to `inner(vec![])`.
pub fn capture<N: 'static>(channels: Vec<ChannelHandle<N>>, inner: CaptureInner<N>) -> N {
    debug!(channels = channels.len(), "Capturing ambient values at boundary position");

    let values: Rc<RefCell<Vec<AmbientValue>>> =
        Rc::new(RefCell::new(Vec::with_capacity(channels.len())));

    // Innermost frame: every read has fired, hand the values over.
    let mut render: Box<dyn FnOnce() -> N> = {
        let values = Rc::clone(&values);
        Box::new(move || inner(values.take()))
    };

    // Wrap inside-out so the first-registered channel ends up outermost and
    // its read fires first, keeping value order equal to channel order.
    for channel in channels.into_iter().rev() {
        let next = render;
        let values = Rc::clone(&values);
        render = Box::new(move || {
            channel.read(Box::new(move |value| {
                values.borrow_mut().push(value);
                next()
            }))
        });
    }

    render()
}

/// Build the write half: provider frames re-establishing each captured
/// value around `element`, nested in the same order the values were read.
pub fn reestablish<N>(
    channels: &[ChannelHandle<N>],
    values: Vec<AmbientValue>,
    element: N,
) -> N {
    debug_assert_eq!(
        channels.len(),
        values.len(),
        "captured value count must match channel count"
    );

    let mut element = element;
    for (channel, value) in channels.iter().zip(values).rev() {
        element = channel.write(value, element);
    }
    element
}
