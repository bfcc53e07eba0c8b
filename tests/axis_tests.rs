use chartframe::api::Axis;
use chartframe::core::{Edge, Frame, Scale, Ticker, Viewport};
use chartframe::error::ChartError;
use chartframe::render::{CanvasLayerKind, HeuristicTextMeasurer, RenderFrame};

#[test]
fn log_axis_defaults_to_one_decade() {
    let axis = Axis::log(Edge::Left, 10.0).expect("log axis");
    assert_eq!(axis.config.empty_range, (1.0, 10.0));
    assert_eq!(axis.get_range(false), (1.0, 10.0));
    assert!(axis.clone().zoom(Some(-1.0), Some(10.0)).is_err());
}

#[test]
fn mismatched_scale_and_ticker_fail_fast() {
    let mut axis = Axis::linear(Edge::Bottom).expect("axis");
    assert!(matches!(
        axis.set_ticker(Ticker::log(10.0)),
        Err(ChartError::IncompatibleTicker { .. })
    ));
    assert!(axis.set_scale(Scale::log(1.0, 100.0, 10.0).expect("log")).is_err());
    assert!(axis.set_ticker(Ticker::fixed(vec![0.0, 0.5, 1.0], Vec::new())).is_ok());
}

#[test]
fn horizontal_axis_binds_left_to_right() {
    let mut axis = Axis::linear(Edge::Top).expect("axis");
    axis.bind_range(Frame::new(50.0, 0.0, 300.0, 20.0)).expect("bind");
    assert_eq!(axis.get_range(true), (50.0, 350.0));
}

#[test]
fn tooltip_uses_ticker_formatting() {
    let mut axis = Axis::linear(Edge::Bottom).expect("axis");
    axis.zoom(Some(0.0), Some(10.0)).expect("zoom");
    assert_eq!(axis.get_tooltip(4.0), "4");

    axis.zoom(Some(0.0), Some(5_000_000.0)).expect("zoom");
    assert!(axis.get_tooltip(2_000_000.0).ends_with("e6"));
}

#[test]
fn vertical_extent_depends_on_label_width() {
    let measurer = HeuristicTextMeasurer::default();
    let mut narrow = Axis::linear(Edge::Left).expect("axis");
    narrow.zoom(Some(0.0), Some(10.0)).expect("zoom");
    let mut wide = Axis::linear(Edge::Left).expect("axis");
    wide.zoom(Some(10_000.0), Some(90_000.0)).expect("zoom");
    assert!(wide.get_extent(&measurer) > narrow.get_extent(&measurer));
}

#[test]
fn hidden_parts_shrink_extent() {
    let measurer = HeuristicTextMeasurer::default();
    let mut axis = Axis::linear(Edge::Bottom).expect("axis");
    axis.config.show_labels = false;
    axis.config.show_major_ticks = false;
    axis.config.show_minor_ticks = false;
    assert_eq!(axis.get_extent(&measurer), 0.0);
}

#[test]
fn draw_emits_line_ticks_and_labels() {
    let measurer = HeuristicTextMeasurer::default();
    let frame = Frame::new(40.0, 300.0, 500.0, 30.0);
    let mut axis = Axis::linear(Edge::Bottom).expect("axis").with_title("Distance");
    axis.zoom(Some(0.0), Some(100.0)).expect("zoom");
    axis.bind_range(frame).expect("bind");

    let mut target = RenderFrame::new(Viewport::new(600, 400));
    axis.draw(frame, &mut target, &measurer).expect("draw");

    let layer = target.layer(CanvasLayerKind::Decoration).expect("decoration layer");
    let majors = axis.ticker().major_ticks().len();
    let minors = axis.ticker().minor_ticks().len();
    assert_eq!(layer.lines.len(), 1 + majors + minors);
    assert_eq!(layer.texts.len(), majors + 1);
    target.validate().expect("valid frame");
}

#[test]
fn overlapping_labels_are_dropped() {
    let measurer = HeuristicTextMeasurer::default();
    let frame = Frame::new(0.0, 0.0, 40.0, 30.0);
    let mut axis = Axis::linear(Edge::Bottom).expect("axis");
    axis.zoom(Some(0.0), Some(1_000.0)).expect("zoom");
    axis.bind_range(frame).expect("bind");

    let mut crowded = RenderFrame::new(Viewport::new(100, 100));
    axis.draw(frame, &mut crowded, &measurer).expect("draw");
    axis.config.label_overlap = true;
    let mut all = RenderFrame::new(Viewport::new(100, 100));
    axis.draw(frame, &mut all, &measurer).expect("draw");

    assert!(crowded.text_count() < all.text_count());
    assert_eq!(all.text_count(), axis.ticker().major_ticks().len());
}
