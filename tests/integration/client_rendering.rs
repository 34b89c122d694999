//! Live-mode rendering through the boundary
//!
//! Mirrors a browser runtime: the host's render pass evaluates the
//! boundary's children in place, catches descendant failures through the
//! lifecycle hook, and re-renders the boundary in its failed phase.

use std::rc::Rc;

use firebreak::boundary::{BoundaryFactory, Children, Fallback, RenderMode};
use firebreak::host::{Host, LegacyValues};

use super::test_utils::{
    catch, component, consume_text, create_channel, el, failing, legacy_text, legacy_values, text,
    with_legacy, Node, TestHost,
};

fn fall_back() -> Fallback<Node> {
    Fallback::render(|_| el("div", vec![text("FallBack!")]))
}

fn live_boundary(host: &Rc<TestHost>, children: Children<Node>, fallback: Fallback<Node>) -> Node {
    let boundary = BoundaryFactory::new().mount(
        Rc::clone(host),
        children,
        fallback,
        &LegacyValues::new(),
        RenderMode::Live,
    );
    catch(boundary, None)
}

#[test]
fn test_renders_child_component_without_errors() {
    let host = TestHost::new();
    let children = Children::element(component("GoodComponent", || {
        Ok(el("div", vec![text("No errors!")]))
    }));

    let tree = live_boundary(&host, children, fall_back());
    let html = host.render_to_static_markup(tree).unwrap();

    assert_eq!(html, "<div>No errors!</div>");
}

#[test]
fn test_renders_fallback_when_child_rendering_fails() {
    let host = TestHost::new();
    let children = Children::element(failing("BadComponent", "render exploded"));

    let tree = live_boundary(&host, children, fall_back());
    let html = host.render_to_static_markup(tree).unwrap();

    assert_eq!(html, "<div>FallBack!</div>");
}

#[test]
fn test_renders_nothing_when_child_fails_and_no_fallback_provided() {
    let host = TestHost::new();
    let children = Children::element(failing("BadComponent", "render exploded"));

    let tree = live_boundary(&host, children, Fallback::default());
    let html = host.render_to_static_markup(tree).unwrap();

    assert_eq!(html, "");
}

#[test]
fn test_function_as_child_sees_no_failure_while_intact() {
    let host = TestHost::new();
    let children = Children::render(|failure| {
        assert!(failure.is_none(), "intact boundary must pass no failure");
        el("div", vec![text("No errors!")])
    });

    let tree = live_boundary(&host, children, fall_back());
    let html = host.render_to_static_markup(tree).unwrap();

    assert_eq!(html, "<div>No errors!</div>");
}

#[test]
fn test_renders_child_with_legacy_context_dependency() {
    let host = TestHost::new();
    let children = Children::element(with_legacy(|visible| {
        let value = legacy_text(visible, "someContext");
        el("div", vec![text(format!("No errors! {value}"))])
    }));

    // Provider sits outside the boundary; live mode relies on the host's
    // own top-down propagation, the boundary adds nothing.
    let tree = Node::ProvideLegacy {
        values: legacy_values("someContext", "Context variable"),
        child: Box::new(live_boundary(&host, children, fall_back())),
    };
    let html = host.render_to_static_markup(tree).unwrap();

    assert_eq!(html, "<div>No errors! Context variable</div>");
}

#[test]
fn test_renders_child_with_ambient_context_dependency() {
    let host = TestHost::new();
    let channel = create_channel(&host, Rc::new(String::new()));

    let children = Children::element(consume_text(&channel, |value| {
        el("div", vec![text(format!("No errors! {value}"))])
    }));
    let tree = channel.write(
        Rc::new("Context variable".to_string()),
        live_boundary(&host, children, fall_back()),
    );
    let html = host.render_to_static_markup(tree).unwrap();

    assert_eq!(html, "<div>No errors! Context variable</div>");
}

#[test]
fn test_renders_child_with_multiple_ambient_contexts() {
    let host = TestHost::new();
    let first = create_channel(&host, Rc::new(String::new()));
    let second = create_channel(&host, Rc::new(String::new()));
    let third = create_channel(&host, Rc::new(String::new()));

    let children = Children::element(consume_text(&first, {
        let second = Rc::clone(&second);
        let third = Rc::clone(&third);
        move |v1| {
            consume_text(&second, {
                let third = Rc::clone(&third);
                move |v2| {
                    consume_text(&third, move |v3| {
                        el("div", vec![text(format!("No errors! {v1} {v2} {v3}"))])
                    })
                }
            })
        }
    }));

    let tree = first.write(
        Rc::new("Context variable1".to_string()),
        second.write(
            Rc::new("Context variable2".to_string()),
            third.write(
                Rc::new("Context variable3".to_string()),
                live_boundary(&host, children, fall_back()),
            ),
        ),
    );
    let html = host.render_to_static_markup(tree).unwrap();

    assert_eq!(
        html,
        "<div>No errors! Context variable1 Context variable2 Context variable3</div>"
    );
}

#[test]
fn test_renders_fallback_when_failure_happens_under_a_consumer() {
    let host = TestHost::new();
    let channel = create_channel(&host, Rc::new(String::new()));

    let children = Children::element(consume_text(&channel, |_| {
        failing("BadComponentInner", "render exploded")
    }));
    let tree = channel.write(
        Rc::new("Context variable".to_string()),
        live_boundary(&host, children, fall_back()),
    );
    let html = host.render_to_static_markup(tree).unwrap();

    assert_eq!(html, "<div>FallBack!</div>");
}

#[test]
fn test_fallback_receives_failure_and_component_trace() {
    let host = TestHost::new();
    let children = Children::element(el(
        "section",
        vec![component("Outer", || Ok(failing("BadComponent", "boom")))],
    ));
    let fallback = Fallback::render(|failure| {
        let failure = failure.expect("live mode must expose the captured failure");
        let trace = failure
            .trace
            .as_ref()
            .map(|trace| trace.to_string())
            .unwrap_or_default();
        el(
            "div",
            vec![text(format!("error: {} at: {trace}", failure.source))],
        )
    });

    let tree = live_boundary(&host, children, fallback);
    let html = host.render_to_static_markup(tree).unwrap();

    assert_eq!(html, "<div>error: boom at: Outer &gt; BadComponent</div>");
}
