//! Firebreak: dual-mode error boundary for component trees
//!
//! Wraps a subtree of host-framework components so a render failure is
//! contained and swapped for a fallback instead of crashing the page, in a
//! live (browser) render pass and in server-side static pre-rendering
//! alike. The server pathway captures the ambient and legacy context
//! visible at the boundary's position and re-establishes it inside the
//! isolated pre-render, so wrapped subtrees observe the same context they
//! would in a normal top-down render.

pub mod boundary;
pub mod bridge;
pub mod error;
pub mod host;
pub mod registry;
pub mod server;
pub mod tracking;
