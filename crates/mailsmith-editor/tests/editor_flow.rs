//! End-to-end editor flows: activate, edit, synchronize, tear down.

use mailsmith_editor::{
    BackgroundPanel, CanvasHost, EditorConfig, EmailDocument, GradientPanel, Mount,
    Organization, PreviewRenderer, PullOutcome, Variable,
};

fn host_for(combined: &str) -> CanvasHost {
    CanvasHost::new(
        EditorConfig::default(),
        Organization::new("org-1", "Acme Studios").with_feature("partner_content"),
        vec![
            Variable::new("first_name"),
            Variable::new("unsubscribe_url"),
        ],
        EmailDocument::from_combined("Welcome", combined),
    )
}

#[test]
fn full_session_round_trips_content() {
    let combined = "<style>p { color: #333333; }</style>\
                    <body><div style=\"padding:20px\"><p>Hi {{first_name}}!</p></div></body>";
    let mut host = host_for(combined);

    host.activate(Some(&Mount::new("canvas"))).unwrap();
    let outcome = host.deactivate();
    assert_ne!(outcome, PullOutcome::GuardedEmpty);

    let doc = host.document();
    assert!(doc.html.contains("padding:20px"));
    assert!(doc.html.contains("{{first_name}}"));
    assert_eq!(doc.css, "p { color: #333333; }");

    // A second session over the synced document changes nothing.
    host.activate(Some(&Mount::new("canvas"))).unwrap();
    assert_eq!(host.deactivate(), PullOutcome::Unchanged);
}

#[test]
fn insertion_policy_places_sibling_after_selection() {
    let mut host = host_for("<body><p>First</p><p>Second</p></body>");
    host.activate(Some(&Mount::new("canvas"))).unwrap();

    // No selection: the heading appends after the last paragraph and
    // becomes the selection.
    host.insert_block("heading").unwrap();
    let html = host.document().html.clone();
    assert!(html.find("Second").unwrap() < html.find("<h2").unwrap());

    // Selection present: the divider lands as the very next sibling.
    host.insert_block("divider").unwrap();
    let html = host.document().html.clone();
    let after_heading = &html[html.find("</h2>").unwrap() + "</h2>".len()..];
    assert!(after_heading.starts_with("<hr"));
}

#[test]
fn gated_block_present_only_with_feature() {
    let mut gated = host_for("<body><p>Hi</p></body>");
    gated.activate(Some(&Mount::new("canvas"))).unwrap();
    assert!(gated.registry().unwrap().get("partner-banner").is_some());

    let mut plain = CanvasHost::new(
        EditorConfig::default(),
        Organization::new("org-2", "Plain Org"),
        Vec::new(),
        EmailDocument::new("s", "<p>Hi</p>", ""),
    );
    plain.activate(Some(&Mount::new("canvas"))).unwrap();
    assert!(plain.registry().unwrap().get("partner-banner").is_none());
    assert!(plain.insert_block("partner-banner").is_err());
}

#[test]
fn background_channels_stay_mutually_exclusive() {
    let mut host = host_for("<body><div>x</div></body>");
    host.activate(Some(&Mount::new("canvas"))).unwrap();
    host.insert_block("spacer").unwrap();

    host.apply_gradient(&GradientPanel {
        angle: 135,
        start: "#4BBF39".into(),
        end: "#2E8B57".into(),
    })
    .unwrap();
    assert!(host.document().html.contains("linear-gradient(135deg, #4BBF39, #2E8B57)"));
    assert!(!host.document().html.contains("background-color"));

    host.apply_background(&BackgroundPanel {
        color: "rgb(75,191,57)".into(),
    })
    .unwrap();
    assert!(host.document().html.contains("background-color:#4BBF39"));
    assert!(!host.document().html.contains("linear-gradient"));

    host.clear_background().unwrap();
    assert!(!host.document().html.contains("background-color"));
    assert!(!host.document().html.contains("linear-gradient"));
}

#[test]
fn teardown_never_wipes_real_content() {
    // Start from an empty document and build content on the canvas.
    let mut host = host_for("<body></body>");
    host.activate(Some(&Mount::new("canvas"))).unwrap();
    host.insert_block("divider").unwrap();
    assert!(host.document().html.contains("<hr"));

    // Deleting the only node empties the canvas; the guarded pull
    // keeps the last non-empty document, through teardown included.
    assert!(host.delete_selected());
    assert!(host.document().html.contains("<hr"));
    assert_eq!(host.deactivate(), PullOutcome::GuardedEmpty);
    assert!(host.document().html.contains("<hr"));
}

#[test]
fn preview_substitutes_without_mutating_document() {
    let host = host_for("<body><p>Hi {{first_name}}!</p></body>");
    let renderer = PreviewRenderer::new();
    let out = renderer.render(host.document(), &[Variable::new("first_name")]);

    assert!(out.contains("<span class=\"preview-variable\">Sarah</span>"));
    assert!(!out.contains("{{"));
    // The document itself still carries the token.
    assert!(host.document().html.contains("{{first_name}}"));
}
