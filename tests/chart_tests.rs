use chartframe::api::{
    Axis, Chart, ChartConfig, DATA_FRAME_TAG, DrawOutcome, FrameOverrides, Graphic, GraphicKind,
    Grid, GridOrientation, Legend, Property, Series, Title,
};
use chartframe::core::{DataPoint, Edge, Quad, Viewport};
use chartframe::error::ChartError;
use chartframe::render::{CanvasLayerKind, HeuristicTextMeasurer, NullRenderer};
use chartframe::venn::{VennDiagram, VennValues};

fn line_chart() -> Chart {
    let config = ChartConfig::new(Viewport::new(800, 600)).with_padding(Quad::uniform(20.0));
    let mut chart = Chart::new(config).expect("chart");

    chart
        .add(Graphic::new("x", Axis::linear(Edge::Bottom).expect("x axis").with_level(1)))
        .expect("add x");
    chart
        .add(Graphic::new(
            "y",
            Axis::linear(Edge::Left).expect("y axis").with_autoscale(true),
        ))
        .expect("add y");
    chart
        .add(Graphic::new("title", Title::new("Throughput")))
        .expect("add title");
    chart.add(Graphic::new("legend", Legend::default())).expect("add legend");

    chart
        .add(Graphic::new("grid", Grid::new(GridOrientation::Vertical)).with_z_index(1))
        .expect("add grid");
    chart.map("grid", Property::Scale, "x", Property::Scale).expect("grid scale");
    chart.map("grid", Property::Ticker, "x", Property::Ticker).expect("grid ticker");

    let points = (0..50)
        .map(|i| DataPoint::new(f64::from(i), (f64::from(i) * 0.3).sin() * 10.0))
        .collect();
    chart
        .add(Graphic::new("load", Series::new("load", points).expect("series")))
        .expect("add series");
    chart.plot("load", "x", "y").expect("plot");
    chart
}

#[test]
fn draw_runs_full_pipeline() {
    let mut chart = line_chart();
    chart.zoom(None, None, None, true).expect("zoom all");

    let mut renderer = NullRenderer::default();
    let measurer = HeuristicTextMeasurer::default();
    let outcome = chart.draw(&mut renderer, &measurer).expect("draw");

    let DrawOutcome::Drawn(layout) = outcome else {
        panic!("chart should have room");
    };
    assert_eq!(renderer.render_count, 1);
    assert_eq!(chart.data_frame(), layout.data_frame);
    assert_eq!(chart.get_frame(DATA_FRAME_TAG).expect("data frame"), layout.data_frame);

    let frame = renderer.last_frame.as_ref().expect("rendered frame");
    let plot = frame.layer(CanvasLayerKind::Plot).expect("plot layer");
    assert_eq!(plot.clip, Some(layout.data_frame));
    assert!(plot.lines.len() >= 49);
    assert_eq!(frame.layer(CanvasLayerKind::Background).expect("background").rects.len(), 1);

    let x_range = chart.axis("x").expect("x").get_range(true);
    assert_eq!(x_range, (layout.data_frame.x1(), layout.data_frame.x2()));
    let Some(GraphicKind::Grid(grid)) = chart.get_obj("grid").map(|graphic| &graphic.kind) else {
        panic!("grid graphic");
    };
    assert_eq!(grid.scale.as_ref().expect("mirrored scale").range(), x_range);
}

#[test]
fn legend_collects_series_titles() {
    let mut chart = line_chart();
    let mut renderer = NullRenderer::default();
    chart
        .draw(&mut renderer, &HeuristicTextMeasurer::default())
        .expect("draw");

    let Some(GraphicKind::Legend(legend)) = chart.get_obj("legend").map(|graphic| &graphic.kind)
    else {
        panic!("legend graphic");
    };
    assert_eq!(legend.items.len(), 1);
    assert_eq!(legend.items[0].text, "load");
}

#[test]
fn reversed_frame_draws_background_only() {
    let config = ChartConfig::new(Viewport::new(400, 300)).with_frame_overrides(FrameOverrides {
        x1: Some(300.0),
        x2: Some(100.0),
        ..FrameOverrides::default()
    });
    let mut chart = Chart::new(config).expect("chart");
    chart
        .add(Graphic::new("x", Axis::linear(Edge::Bottom).expect("axis")))
        .expect("add");

    let mut renderer = NullRenderer::default();
    let outcome = chart
        .draw(&mut renderer, &HeuristicTextMeasurer::default())
        .expect("draw");

    assert!(matches!(outcome, DrawOutcome::NoRoom(_)));
    assert_eq!(renderer.render_count, 1);
    assert_eq!(renderer.last_rect_count, 1);
    assert_eq!(renderer.last_line_count, 0);
    assert_eq!(renderer.last_text_count, 0);
}

#[test]
fn hit_test_prefers_data_frame_then_top_decoration() {
    let mut chart = line_chart();
    let layout = chart.layout(&HeuristicTextMeasurer::default()).expect("layout");

    let data = layout.data_frame;
    assert_eq!(chart.get_obj_below(data.cx(), data.cy()), Some(DATA_FRAME_TAG));

    let title = layout.frame("title").expect("title frame");
    assert_eq!(chart.get_obj_below(title.cx(), title.cy()), Some("title"));
    assert_eq!(chart.get_obj_below(1.0, 1.0), None);
}

#[test]
fn registry_rejects_invalid_operations() {
    let mut chart = line_chart();

    assert!(matches!(
        chart.remove("x"),
        Err(ChartError::MappingSourceInUse { .. })
    ));
    assert!(matches!(chart.remove("ghost"), Err(ChartError::UnknownTag(_))));
    assert!(matches!(
        chart.map("grid", Property::XScale, "x", Property::Scale),
        Err(ChartError::PropertyMismatch { .. })
    ));
    assert!(matches!(
        chart.map("grid", Property::Scale, "ghost", Property::Scale),
        Err(ChartError::UnknownTag(_))
    ));
    assert!(matches!(
        chart.get_frame("ghost"),
        Err(ChartError::UnknownTag(_))
    ));

    chart.remove("load").expect("series is no source");
    assert!(chart.unmap("grid", Property::Scale));
    assert!(chart.unmap("grid", Property::Ticker));
    chart.remove("x").expect("x is free now");
}

#[test]
fn decoration_without_position_fails_layout() {
    let mut chart = Chart::new(ChartConfig::default()).expect("chart");
    let mut title = Title::new("orphan");
    title.position = None;
    chart.add(Graphic::new("title", title)).expect("add");
    let err = chart
        .layout(&HeuristicTextMeasurer::default())
        .expect_err("no position");
    assert!(matches!(err, ChartError::UnknownPosition { .. }));
}

#[test]
fn venn_chart_draws_regions_and_legend() {
    let mut chart = Chart::new(ChartConfig::default()).expect("chart");
    let values = VennValues::new(10.0, 8.0, 22.0, 6.0, 9.0, 4.0, 2.0).expect("values");
    chart
        .add(Graphic::new("venn", VennDiagram::new(values).expect("diagram")))
        .expect("add venn");
    chart.add(Graphic::new("legend", Legend::default())).expect("add legend");

    let mut renderer = NullRenderer::default();
    let outcome = chart
        .draw(&mut renderer, &HeuristicTextMeasurer::default())
        .expect("draw");
    assert!(matches!(outcome, DrawOutcome::Drawn(_)));
    assert!(renderer.last_path_count >= 3);

    let Some(GraphicKind::Legend(legend)) = chart.get_obj("legend").map(|graphic| &graphic.kind)
    else {
        panic!("legend graphic");
    };
    assert_eq!(legend.items.len(), 3);
}
