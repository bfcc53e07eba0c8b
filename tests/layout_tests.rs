use chartframe::api::{DecorationSlot, FrameOverrides, Layout, LayoutNegotiator};
use chartframe::core::{Edge, Frame, Quad};

fn negotiator() -> LayoutNegotiator {
    LayoutNegotiator::new(Frame::new(0.0, 0.0, 800.0, 600.0), Quad::uniform(20.0))
        .expect("valid negotiator")
}

#[test]
fn facing_margins_collapse_to_their_maximum() {
    // Inner slot faces outward with 3, outer slot faces inward with 8.
    let slots = [
        DecorationSlot::new("axis", Edge::Bottom, 30.0).with_margin(Quad::new(10.0, 0.0, 3.0, 0.0)),
        DecorationSlot::new("bar", Edge::Bottom, 7.0).with_margin(Quad::new(8.0, 0.0, 5.0, 0.0)),
    ];
    let layout = negotiator().compute(&slots).expect("layout");

    let axis = layout.frame("axis").expect("axis frame");
    let bar = layout.frame("bar").expect("bar frame");
    assert_eq!(bar.y1() - axis.y2(), 8.0);
    assert_eq!(axis.y1() - layout.data_frame.y2(), 10.0);
    // Outermost margin (5) is not reserved.
    assert_eq!(bar.y2(), 600.0 - 20.0);
}

#[test]
fn compute_is_idempotent() {
    let slots = [
        DecorationSlot::new("title", Edge::Top, 16.0).with_margin(Quad::uniform(10.0)),
        DecorationSlot::new("y", Edge::Left, 42.0).with_margin(Quad::uniform(10.0)),
        DecorationSlot::new("legend", Edge::Right, 90.0).with_margin(Quad::uniform(10.0)),
    ];
    let negotiator = negotiator();
    let first = negotiator.compute(&slots).expect("first");
    let second = negotiator.compute(&slots).expect("second");
    assert_eq!(first, second);
}

#[test]
fn each_edge_is_laid_out_independently() {
    let slots = [
        DecorationSlot::new("left", Edge::Left, 40.0),
        DecorationSlot::new("right", Edge::Right, 60.0),
        DecorationSlot::new("top", Edge::Top, 16.0),
        DecorationSlot::new("bottom", Edge::Bottom, 24.0),
    ];
    let layout = negotiator().compute(&slots).expect("layout");
    let data = layout.data_frame;
    assert_eq!((data.x1(), data.x2()), (60.0, 720.0));
    assert_eq!((data.y1(), data.y2()), (36.0, 556.0));

    let left = layout.frame("left").expect("left");
    assert_eq!((left.x1(), left.x2()), (20.0, 60.0));
    assert_eq!((left.y1(), left.y2()), (data.y1(), data.y2()));
    let top = layout.frame("top").expect("top");
    assert_eq!((top.x1(), top.x2()), (data.x1(), data.x2()));
}

#[test]
fn overrides_fix_data_frame_edges() {
    let slots = [DecorationSlot::new("x", Edge::Bottom, 30.0)];
    let layout = negotiator()
        .with_overrides(FrameOverrides {
            y2: Some(500.0),
            ..FrameOverrides::default()
        })
        .compute(&slots)
        .expect("layout");
    assert_eq!(layout.data_frame.y2(), 500.0);
    assert_eq!(layout.frame("x").expect("x").y1(), 500.0);
}

#[test]
fn negative_extent_is_rejected() {
    let slots = [DecorationSlot::new("broken", Edge::Left, -1.0)];
    assert!(negotiator().compute(&slots).is_err());
    assert!(LayoutNegotiator::new(Frame::new(0.0, 0.0, 10.0, 10.0), Quad::uniform(-1.0)).is_err());
}

#[test]
fn insufficient_space_reverses_frame() {
    let slots = [DecorationSlot::new("huge", Edge::Top, 700.0)];
    let layout = negotiator().compute(&slots).expect("layout");
    assert!(layout.data_frame.is_reversed());
    assert!(!layout.has_room());
}

#[test]
fn layout_snapshot_json_round_trip() {
    let slots = [DecorationSlot::new("y", Edge::Left, 42.0)];
    let layout = negotiator().compute(&slots).expect("layout");
    let json = layout.to_json_pretty().expect("serialize");
    assert!(json.contains("\"schema_version\": 1"));
    let restored = Layout::from_json_str(&json).expect("parse");
    assert_eq!(restored, layout);
    assert!(Layout::from_json_str("{\"schema_version\": 9, \"layout\": {}}").is_err());
}
