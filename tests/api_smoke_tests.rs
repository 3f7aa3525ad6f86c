use approx::assert_relative_eq;
use chart_curve_sync::CurveListSynchronizer;
use chart_curve_sync::api::{InsertSeeding, SynchronizerConfig};
use chart_curve_sync::core::Viewport;
use chart_curve_sync::model::{Curve, CurveCollection, MarkerType};
use chart_curve_sync::render::{Color, NullRenderer};
use chart_curve_sync::widget::{ChartWidget, MemoryChart, MemoryChartConfig};

#[test]
fn synchronizer_smoke_flow() {
    let config = MemoryChartConfig::from_json_str(r#"{"viewport":{"width":640,"height":480}}"#)
        .expect("chart config");
    assert_eq!(config.viewport, Viewport::new(640, 480));
    let chart = MemoryChart::new(NullRenderer::default(), config).expect("chart init");
    let sync_config = SynchronizerConfig::from_json_str(r#"{"insert_seeding":"FullStyle"}"#)
        .expect("sync config");
    assert_eq!(sync_config.insert_seeding, InsertSeeding::FullStyle);
    let sync = CurveListSynchronizer::with_config(chart, sync_config);

    let collection = CurveCollection::shared();
    sync.bind(&collection);
    assert!(sync.is_bound());

    let curve = Curve::from_xy(&[0.0, 1.0, 2.0], &[10.0, 20.0, 15.0]).expect("curve");
    curve.set_name("Load");
    curve.set_marker_type(MarkerType::Circle);
    let curve = collection.push(curve).expect("push");

    curve.add_points([(3.0, 30.0)]);
    curve.set_color(Color::RED);

    sync.with_widget(|chart| {
        assert_eq!(chart.curve_count(), 1);
        let entry = chart.entry_by_tag(curve.tag()).expect("entry");
        assert_eq!(entry.points.len(), 4);
        assert_eq!(entry.color, Color::RED);
        assert_eq!(entry.marker, MarkerType::Circle);

        let y_range = chart.y_range();
        assert_relative_eq!(y_range.min, 9.0, epsilon = 1e-9);
        assert_relative_eq!(y_range.max, 31.0, epsilon = 1e-9);
        assert_relative_eq!(chart.x_range().max, 3.15, epsilon = 1e-9);

        let renderer = chart.renderer();
        assert!(renderer.frames_rendered >= 3);
        assert_eq!(renderer.last_segment_count, 3);
        assert_eq!(renderer.last_marker_count, 4);
        assert_eq!(renderer.last_legend_count, 1);
    });

    collection.remove(0).expect("remove");
    assert_eq!(sync.with_widget(|chart| chart.curve_count()), 0);
    assert_eq!(sync.curves_count(), 0);

    let stats = sync.stats();
    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.rebuilds, 1);
    assert_eq!(stats.in_place_updates, 1);
    assert_eq!(stats.desyncs, 0);
}
