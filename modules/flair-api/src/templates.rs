use dioxus::prelude::{Element, VirtualDom};

/// Server-render a root component into a complete HTML document.
pub fn render_page<P: Clone + 'static>(root: fn(P) -> Element, props: P) -> String {
    let mut dom = VirtualDom::new_with_props(root, props);
    dom.rebuild_in_place();
    format!(
        "<!DOCTYPE html><html lang=\"en\">{}</html>",
        dioxus::ssr::render(&dom)
    )
}
