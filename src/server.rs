//! Server-side pre-rendering of a boundary's subtree.
//!
//! Static runtimes cannot lean on the host's failure-capture lifecycle, so
//! the renderer serializes the subtree itself, inside the surrounding
//! render pass, and decides synchronously between real markup and the
//! fallback. Ambient context is preserved across the isolation seam by the
//! [`bridge`](crate::bridge); legacy context by the host's pass-through
//! provider fed with the values the boundary captured at mount.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::boundary::Boundary;
use crate::bridge;
use crate::host::Host;
use crate::registry::RegistryHandle;

/// Tuning for the static pre-render pathway. Embeddable in an
/// application's own configuration file; every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererOptions {
    /// Pass the captured failure to the fallback renderer. Off restores the
    /// historical contract of invoking the fallback with no payload.
    #[serde(default = "default_forward_failure")]
    pub forward_failure: bool,
}

fn default_forward_failure() -> bool {
    true
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            forward_failure: default_forward_failure(),
        }
    }
}

/// Renders boundaries to static markup within one render batch.
///
/// The registry is owned by whoever drives the batch and injected here, so
/// no registration state leaks across batches or tests.
pub struct ServerRenderer<H: Host> {
    host: Rc<H>,
    registry: RegistryHandle<H::Node>,
    options: RendererOptions,
}

impl<H> ServerRenderer<H>
where
    H: Host + 'static,
    H::Node: 'static,
{
    pub fn new(host: Rc<H>, registry: RegistryHandle<H::Node>) -> Self {
        Self::with_options(host, registry, RendererOptions::default())
    }

    pub fn with_options(
        host: Rc<H>,
        registry: RegistryHandle<H::Node>,
        options: RendererOptions,
    ) -> Self {
        Self {
            host,
            registry,
            options,
        }
    }

    pub fn registry(&self) -> &RegistryHandle<H::Node> {
        &self.registry
    }

    /// Pre-render `boundary`'s subtree to static markup at the boundary's
    /// tree position.
    ///
    /// Returns the node the boundary emits in its place: on success the
    /// markup string wrapped for raw injection in the renderer's own
    /// container, on failure the fallback output. The returned tree embeds
    /// the bridge's consumer frames, so the host's surrounding render pass
    /// evaluates them where the boundary sits and the isolated serialize
    /// below observes the same ambient values a top-down render would
    /// supply.
    pub fn render(&self, boundary: &mut Boundary<H>) -> H::Node {
        let child = boundary.take_children();
        let element = self
            .host
            .provide_legacy(boundary.inherited_legacy().clone(), child);

        let channels = self.registry.snapshot();
        let frames = channels.clone();
        let host = Rc::clone(&self.host);
        let fallback = boundary.take_fallback();
        let forward_failure = self.options.forward_failure;

        bridge::capture(
            channels,
            Box::new(move |values| {
                let wrapped = bridge::reestablish(&frames, values, element);
                match host.render_to_static_markup(wrapped) {
                    Ok(markup) => host.raw_container(markup),
                    Err(failure) => {
                        warn!(error = %failure, "Static pre-render failed; emitting fallback");
                        let mut fallback = fallback;
                        let report = if forward_failure { Some(&failure) } else { None };
                        fallback.produce(report, host.as_ref())
                    }
                }
            }),
        )
    }
}
