//! Creation interception end to end
//!
//! Channels created through the tracked factory must reach the registry
//! without any manual step, and installing the tracker twice must not
//! change the entry point's identity.

use std::rc::Rc;

use firebreak::boundary::{BoundaryFactory, Children, Fallback, RenderMode};
use firebreak::host::{ChannelFactory, Host, LegacyValues};
use firebreak::registry::RegistryHandle;
use firebreak::server::ServerRenderer;
use firebreak::tracking::TrackingFactory;

use super::test_utils::{catch, consume_text, el, text, Node, TestChannelFactory, TestHost};

fn same_factory(a: &Rc<dyn ChannelFactory<Node>>, b: &Rc<dyn ChannelFactory<Node>>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

#[test]
fn test_installing_twice_keeps_entry_point_identity() {
    let host = TestHost::new();
    let registry = RegistryHandle::new();
    let factory: Rc<dyn ChannelFactory<Node>> = Rc::new(TestChannelFactory { host });

    let wrapped = TrackingFactory::install(factory, &registry);
    let wrapped_again = TrackingFactory::install(Rc::clone(&wrapped), &registry);

    assert!(same_factory(&wrapped, &wrapped_again));
}

#[test]
fn test_tracked_creation_needs_no_manual_registration() {
    let host = TestHost::new();
    let registry = RegistryHandle::new();
    let factory = TrackingFactory::install(
        Rc::new(TestChannelFactory {
            host: Rc::clone(&host),
        }),
        &registry,
    );

    // Application code keeps using the creation API it already had.
    let channel = factory.create(Rc::new("default".to_string()));
    assert_eq!(registry.len(), 1);

    let renderer = ServerRenderer::new(Rc::clone(&host), registry.clone());
    let children = Children::element(consume_text(&channel, |value| {
        el("div", vec![text(format!("No errors! {value}"))])
    }));
    let boundary = BoundaryFactory::new().mount(
        Rc::clone(&host),
        children,
        Fallback::default(),
        &LegacyValues::new(),
        RenderMode::Static,
    );
    let tree = channel.write(
        Rc::new("Context variable".to_string()),
        catch(boundary, Some(renderer)),
    );
    let html = host.render_to_static_markup(tree).unwrap();

    assert_eq!(html, "<div><div>No errors! Context variable</div></div>");
}

#[test]
fn test_manual_registration_after_tracked_creation_does_not_duplicate() {
    let host = TestHost::new();
    let registry = RegistryHandle::new();
    let factory = TrackingFactory::install(Rc::new(TestChannelFactory { host }), &registry);

    let channel = factory.create(Rc::new("default".to_string()));
    registry.register(channel);

    assert_eq!(registry.len(), 1);
}
