//! The public-facing boundary component.
//!
//! A boundary wraps one subtree. While intact it renders the subtree
//! verbatim; once a render failure is captured it renders the configured
//! fallback instead, forever: a boundary instance never heals, remounting
//! is the only way back. Live (browser) runtimes drive the failure capture
//! through the host's lifecycle hook; static (server) runtimes delegate the
//! whole render to [`ServerRenderer`], where failures surface synchronously
//! inside the serialize call and the hook is never reached.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::SubtreeFailure;
use crate::host::{Host, LegacyContextTypes, LegacyValues};
use crate::server::ServerRenderer;

/// Runtime the boundary renders in. Fixed per mounted boundary.
///
/// `detect` is the compile-time analog of checking for a browser global
/// once at load time: the `wasm32` target is the browser runtime,
/// everything else pre-renders static markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Live render pass driven by the host lifecycle.
    Live,
    /// Static pre-render to markup.
    Static,
}

impl RenderMode {
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            RenderMode::Live
        } else {
            RenderMode::Static
        }
    }
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::detect()
    }
}

/// What the boundary renders while intact. The caller picks the entry
/// point; the boundary never inspects types at runtime.
pub enum Children<N> {
    /// A fixed subtree, yielded to the host at most once.
    Element(Option<N>),
    /// A render function. Receives the captured failure view, which is
    /// always absent while the boundary is intact; the parameter exists for
    /// signature parity with fallback renderers.
    Render(Box<dyn Fn(Option<&SubtreeFailure>) -> N>),
}

impl<N> Children<N> {
    pub fn element(node: N) -> Self {
        Children::Element(Some(node))
    }

    pub fn render(render: impl Fn(Option<&SubtreeFailure>) -> N + 'static) -> Self {
        Children::Render(Box::new(render))
    }

    fn produce<H: Host<Node = N>>(&mut self, host: &H) -> N {
        match self {
            Children::Element(slot) => slot.take().unwrap_or_else(|| {
                warn!("Child element already yielded; rendering nothing");
                host.empty()
            }),
            Children::Render(render) => render(None),
        }
    }
}

/// What the boundary renders after a captured failure.
pub enum Fallback<N> {
    /// Render nothing. The default.
    Empty,
    /// A fixed element, yielded to the host at most once.
    Element(Option<N>),
    /// Invoked with the captured failure when the pathway has one.
    Render(Box<dyn Fn(Option<&SubtreeFailure>) -> N>),
}

impl<N> Fallback<N> {
    pub fn element(node: N) -> Self {
        Fallback::Element(Some(node))
    }

    pub fn render(render: impl Fn(Option<&SubtreeFailure>) -> N + 'static) -> Self {
        Fallback::Render(Box::new(render))
    }

    pub(crate) fn produce<H: Host<Node = N>>(
        &mut self,
        failure: Option<&SubtreeFailure>,
        host: &H,
    ) -> N {
        match self {
            Fallback::Empty => host.empty(),
            Fallback::Element(slot) => slot.take().unwrap_or_else(|| {
                warn!("Fallback element already yielded; rendering nothing");
                host.empty()
            }),
            Fallback::Render(render) => render(failure),
        }
    }
}

impl<N> Default for Fallback<N> {
    fn default() -> Self {
        Fallback::Empty
    }
}

/// Failure phase of one mounted boundary. `Failed` is terminal.
#[derive(Debug)]
pub enum Phase {
    Intact,
    Failed(SubtreeFailure),
}

/// Builds boundary instances, pre-configured for a set of legacy channels.
pub struct BoundaryFactory {
    legacy_types: LegacyContextTypes,
}

impl BoundaryFactory {
    /// Boundary with no legacy channels declared.
    pub fn new() -> Self {
        Self::with_context(LegacyContextTypes::new())
    }

    /// Boundary variant that passes the given legacy channels through the
    /// static pre-render.
    pub fn with_context(legacy_types: LegacyContextTypes) -> Self {
        Self { legacy_types }
    }

    /// Instantiate a boundary at its mount position.
    ///
    /// `visible_legacy` is the legacy context the host reports at that
    /// position; only declared channels are captured, and each declared
    /// validator runs against the value it captures. Validators are
    /// markers, not gates: a mismatch is logged, never fatal.
    pub fn mount<H: Host>(
        &self,
        host: Rc<H>,
        children: Children<H::Node>,
        fallback: Fallback<H::Node>,
        visible_legacy: &LegacyValues,
        mode: RenderMode,
    ) -> Boundary<H> {
        let mut inherited = LegacyValues::new();
        for (name, validate) in &self.legacy_types {
            match visible_legacy.get(name) {
                Some(value) => {
                    if !validate(value) {
                        warn!(channel = %name, "Inherited legacy value failed its declared validator");
                    }
                    inherited.insert(name.clone(), Rc::clone(value));
                }
                None => {
                    debug!(channel = %name, "Declared legacy channel not provided at mount position");
                }
            }
        }

        Boundary {
            host,
            mode,
            children,
            fallback,
            inherited_legacy: inherited,
            phase: Phase::Intact,
        }
    }
}

impl Default for BoundaryFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// One mounted boundary instance.
pub struct Boundary<H: Host> {
    host: Rc<H>,
    mode: RenderMode,
    children: Children<H::Node>,
    fallback: Fallback<H::Node>,
    inherited_legacy: LegacyValues,
    phase: Phase,
}

impl<H: Host> Boundary<H> {
    /// Host lifecycle hook: a live render pass caught a descendant failure.
    /// The first failure wins; later reports are ignored.
    pub fn on_render_failure(&mut self, failure: SubtreeFailure) {
        match self.phase {
            Phase::Intact => {
                error!(error = %failure, trace = ?failure.trace, "Captured subtree render failure");
                self.phase = Phase::Failed(failure);
            }
            Phase::Failed(_) => {
                debug!("Boundary already failed; ignoring duplicate failure report");
            }
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The failure captured by the lifecycle hook, if any.
    pub fn failure(&self) -> Option<&SubtreeFailure> {
        match &self.phase {
            Phase::Intact => None,
            Phase::Failed(failure) => Some(failure),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Legacy values captured at the mount position, filtered to the
    /// declared channels.
    pub fn inherited_legacy(&self) -> &LegacyValues {
        &self.inherited_legacy
    }

    /// Live render contract: children verbatim while intact, fallback
    /// output once failed.
    pub fn render_live(&mut self) -> H::Node {
        let Boundary {
            host,
            children,
            fallback,
            phase,
            ..
        } = self;

        match &*phase {
            Phase::Intact => children.produce(host.as_ref()),
            Phase::Failed(failure) => fallback.produce(Some(failure), host.as_ref()),
        }
    }

    pub(crate) fn take_children(&mut self) -> H::Node {
        let Boundary { host, children, .. } = self;
        children.produce(host.as_ref())
    }

    pub(crate) fn take_fallback(&mut self) -> Fallback<H::Node> {
        std::mem::take(&mut self.fallback)
    }
}

impl<H> Boundary<H>
where
    H: Host + 'static,
    H::Node: 'static,
{
    /// Render for the boundary's mode: the live contract, or delegation to
    /// the server renderer.
    pub fn render(&mut self, server: &ServerRenderer<H>) -> H::Node {
        match self.mode {
            RenderMode::Live => self.render_live(),
            RenderMode::Static => server.render(self),
        }
    }
}
