use deck_engine::deck_core::{
    LinkTarget, NavigationRequest, NodeError, PlaceholderReason, VisualContent, VisualNode, VisualTree,
};
use deck_engine::deck_data::Document;
use deck_engine::{load_config, EngineError, SlideRenderer};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn solid(hex: &str) -> Value {
    json!({ "type": "solid", "color": { "kind": "srgb", "val": hex } })
}

fn rect(id: u32, fill: Value) -> Value {
    json!({
        "kind": "sp",
        "id": id,
        "name": format!("Rectangle {id}"),
        "xfrm": { "x": 10.0, "y": 10.0, "w": 100.0, "h": 50.0 },
        "geometry": { "kind": "preset", "name": "rect" },
        "fill": fill
    })
}

fn document(slides: Value) -> Document {
    serde_json::from_value(json!({
        "slideWidth": 960.0,
        "slideHeight": 540.0,
        "themes": [{
            "name": "Office",
            "colorScheme": {
                "dk1": "000000", "lt1": "FFFFFF", "dk2": "44546A", "lt2": "E7E6E6",
                "accent1": "4472C4", "accent2": "ED7D31", "hlink": "0563C1", "folHlink": "954F72"
            }
        }],
        "masters": [{
            "path": "ppt/slideMasters/slideMaster1.xml",
            "background": { "kind": "fill", "fill": solid("F2F2F2") },
            "shapes": [
                {
                    "kind": "sp",
                    "id": 2,
                    "placeholder": { "type": "title" },
                    "xfrm": { "x": 40.0, "y": 20.0, "w": 880.0, "h": 80.0 },
                    "txBody": { "lstStyle": {} }
                },
                rect(90, solid("AAAAAA"))
            ]
        }],
        "layouts": [{
            "path": "ppt/slideLayouts/slideLayout1.xml",
            "master": 0,
            "shapes": [rect(80, solid("BBBBBB"))]
        }],
        "slides": slides,
        "media": { "ppt/media/image1.emf": [1, 2, 3, 4] }
    }))
    .expect("document fixture")
}

fn fill_hex(node: &VisualNode) -> Option<String> {
    match &node.content {
        VisualContent::Shape(shape) => shape.paths.first().and_then(|p| p.fill.solid_color()).map(|c| c.hex()),
        _ => None,
    }
}

fn ids(tree: &VisualTree) -> Vec<u32> {
    tree.nodes.iter().filter_map(|n| n.id).collect()
}

fn background_hex(tree: &VisualTree) -> Option<String> {
    tree.background.solid_color().map(|c| c.hex())
}

#[test]
fn test_decorations_render_under_slide_shapes() {
    init_tracing();
    let renderer = SlideRenderer::new(document(json!([{
        "path": "ppt/slides/slide1.xml",
        "shapes": [rect(5, solid("CC3311"))]
    }])));

    let tree = renderer.render_slide(0).expect("slide renders");
    assert_eq!((tree.width, tree.height), (960.0, 540.0));
    assert_eq!(background_hex(&tree), Some("#F2F2F2".to_string()));
    // The master title placeholder is not drawn.
    assert_eq!(ids(&tree), vec![90, 80, 5]);
    assert_eq!(fill_hex(&tree.nodes[2]), Some("#CC3311".to_string()));
}

#[test]
fn test_hidden_master_shapes() {
    let renderer = SlideRenderer::new(document(json!([
        { "showMasterSp": false, "shapes": [rect(5, solid("CC3311"))] },
        { "shapes": [] }
    ])));
    assert_eq!(ids(&renderer.render_slide(0).unwrap()), vec![5]);
    assert_eq!(ids(&renderer.render_slide(1).unwrap()), vec![90, 80]);
}

#[test]
fn test_placeholder_takes_master_position() {
    let renderer = SlideRenderer::new(document(json!([{
        "shapes": [{
            "kind": "sp",
            "id": 7,
            "placeholder": { "type": "ctrTitle" },
            "txBody": { "paragraphs": [{ "runs": [{ "kind": "text", "text": "Welcome" }] }] }
        }]
    }])));

    let tree = renderer.render_slide(0).unwrap();
    let title = tree.nodes.iter().find(|n| n.id == Some(7)).expect("title rendered");
    assert_eq!((title.frame.x, title.frame.y, title.frame.width), (40.0, 20.0, 880.0));
}

#[test]
fn test_slide_color_map_override() {
    let scheme_fill = json!({ "type": "solid", "color": { "kind": "scheme", "val": "bg1" } });
    let renderer = SlideRenderer::new(document(json!([
        { "shapes": [rect(5, scheme_fill.clone())] },
        {
            "clrMapOvr": {
                "bg1": "dk1", "tx1": "lt1", "bg2": "dk2", "tx2": "lt2",
                "accent1": "accent1", "accent2": "accent2", "hlink": "hlink", "folHlink": "folHlink"
            },
            "shapes": [rect(5, scheme_fill)]
        }
    ])));

    let hex = |index: usize| {
        let tree = renderer.render_slide(index).unwrap();
        tree.nodes.iter().find(|n| n.id == Some(5)).and_then(fill_hex)
    };
    assert_eq!(hex(0), Some("#FFFFFF".to_string()));
    assert_eq!(hex(1), Some("#000000".to_string()));
}

#[test]
fn test_bad_indices_are_errors() {
    let renderer = SlideRenderer::new(document(json!([{ "layout": 4 }])));
    assert!(matches!(
        renderer.render_slide(3),
        Err(EngineError::SlideOutOfRange { index: 3, count: 1 })
    ));
    assert!(matches!(
        renderer.render_slide(0),
        Err(EngineError::MissingLayout { slide: 0, layout: 4 })
    ));
}

#[test]
fn test_links_follow_the_navigation_callback() {
    let slides = json!([
        {
            "path": "ppt/slides/slide1.xml",
            "relationships": {
                "rId2": { "type": "hyperlink", "target": "https://example.com", "targetMode": "External" },
                "rId3": { "type": "slide", "target": "slide2.xml" }
            },
            "shapes": [
                {
                    "kind": "sp",
                    "id": 5,
                    "xfrm": { "x": 0.0, "y": 0.0, "w": 50.0, "h": 50.0 },
                    "hlinkClick": { "rId": "rId2" }
                },
                {
                    "kind": "sp",
                    "id": 6,
                    "xfrm": { "x": 0.0, "y": 0.0, "w": 50.0, "h": 50.0 },
                    "hlinkClick": { "rId": "rId3", "action": "ppaction://hlinksldjump" }
                }
            ]
        },
        { "path": "ppt/slides/slide2.xml" }
    ]);

    let mut renderer = SlideRenderer::new(document(slides));
    let tree = renderer.render_slide(0).unwrap();
    assert!(tree.nodes.iter().all(|n| n.link.is_none()));
    assert!(!renderer.navigate(&LinkTarget::Slide(1)));

    let requests = Rc::new(RefCell::new(Vec::<NavigationRequest>::new()));
    let sink = Rc::clone(&requests);
    renderer.on_navigate(move |request| sink.borrow_mut().push(request));

    let tree = renderer.render_slide(0).unwrap();
    let node = |id: u32| tree.nodes.iter().find(|n| n.id == Some(id)).unwrap();
    assert_eq!(node(5).link, Some(LinkTarget::Url("https://example.com".to_string())));
    assert_eq!(node(6).link, Some(LinkTarget::Slide(1)));

    assert!(renderer.activate(node(6)));
    assert!(renderer.activate(node(5)));
    let requests = requests.borrow();
    assert_eq!(requests[0].slide_index, Some(1));
    assert_eq!(requests[1].url.as_deref(), Some("https://example.com"));
}

#[test]
fn test_depth_limit_reports_through_error_callback() {
    let nested = json!({
        "kind": "grpSp",
        "id": 10,
        "children": [{
            "kind": "grpSp",
            "id": 11,
            "children": [rect(12, solid("00FF00"))]
        }]
    });
    let mut renderer = SlideRenderer::new(document(json!([{ "showMasterSp": false, "shapes": [nested] }])))
        .with_config(load_config(r#"{ "max_group_depth": 1 }"#.as_bytes()).unwrap());

    let errors = Rc::new(RefCell::new(Vec::<NodeError>::new()));
    let sink = Rc::clone(&errors);
    renderer.on_error(move |error| sink.borrow_mut().push(error));

    let tree = renderer.render_slide(0).unwrap();
    let inner = &tree.nodes[0].children()[0];
    assert!(matches!(
        inner.content,
        VisualContent::Placeholder {
            reason: PlaceholderReason::Error,
            ..
        }
    ));
    let errors = errors.borrow();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].node_id, Some(11));
}

#[test]
fn test_config_loading() {
    let config = load_config(r#"{ "default_font_size": 24.0 }"#.as_bytes()).unwrap();
    assert_eq!(config.default_font_size, 24.0);
    assert_eq!(config.max_group_depth, 64);
    assert!(load_config("not json".as_bytes()).is_err());

    let renderer = SlideRenderer::new(document(json!([])));
    assert!(matches!(
        renderer.with_config_json(r#"{ "max_group_depth": "deep" }"#),
        Err(EngineError::Config(_))
    ));
}

#[test]
fn test_legacy_images_without_decoder_are_unsupported() {
    let picture = json!({
        "kind": "pic",
        "id": 20,
        "xfrm": { "x": 0.0, "y": 0.0, "w": 64.0, "h": 64.0 },
        "blip": { "embed": "rId1" }
    });
    let slides = json!([{
        "path": "ppt/slides/slide1.xml",
        "showMasterSp": false,
        "relationships": { "rId1": { "type": "image", "target": "../media/image1.emf" } },
        "shapes": [picture]
    }]);
    let renderer = SlideRenderer::new(document(slides));
    let tree = renderer.render_slide(0).unwrap();
    assert!(matches!(
        tree.nodes[0].content,
        VisualContent::Placeholder {
            reason: PlaceholderReason::Unsupported,
            ..
        }
    ));
    assert_eq!(renderer.pending_decodes(), 0);
}
