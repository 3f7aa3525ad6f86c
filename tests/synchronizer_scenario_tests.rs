use chart_curve_sync::CurveListSynchronizer;
use chart_curve_sync::core::DataPoint;
use chart_curve_sync::model::{Curve, CurveCollection, CurveTag, MarkerType};
use chart_curve_sync::render::{Color, NullRenderer};
use chart_curve_sync::widget::{
    ChartWidget, CurveEntry, EntryHandle, MemoryChart, MemoryChartConfig,
};

type Synchronizer = CurveListSynchronizer<MemoryChart<NullRenderer>>;

fn build_synchronizer() -> Synchronizer {
    let chart = MemoryChart::new(NullRenderer::default(), MemoryChartConfig::default())
        .expect("chart init");
    CurveListSynchronizer::new(chart)
}

fn entry(sync: &Synchronizer, tag: &CurveTag) -> CurveEntry {
    sync.with_widget(|chart| chart.entry_by_tag(tag).cloned())
        .expect("entry for tag")
}

fn handle(sync: &Synchronizer, tag: &CurveTag) -> EntryHandle {
    entry(sync, tag).handle
}

#[test]
fn curve_lifecycle_scenario() {
    let sync = build_synchronizer();
    let collection = CurveCollection::shared();
    sync.bind(&collection);

    let c1 = Curve::from_xy(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).expect("curve");
    let c1 = collection.push(c1).expect("insert");
    assert_eq!(sync.with_widget(|chart| chart.curve_count()), 1);
    assert_eq!(entry(&sync, c1.tag()).points.len(), 3);

    let before = handle(&sync, c1.tag());
    c1.set_color(Color::RED);
    assert_eq!(handle(&sync, c1.tag()), before);
    assert_eq!(entry(&sync, c1.tag()).color, Color::RED);

    c1.set_marker_type(MarkerType::Circle);
    let rebuilt = entry(&sync, c1.tag());
    assert_ne!(rebuilt.handle, before);
    assert!(sync.with_widget(|chart| chart.entry(before).is_none()));
    assert_eq!(rebuilt.marker, MarkerType::Circle);
    assert_eq!(
        rebuilt.points,
        vec![
            DataPoint::new(0.0, 0.0),
            DataPoint::new(1.0, 1.0),
            DataPoint::new(2.0, 4.0),
        ]
    );

    c1.add_points([(3.0, 9.0)]);
    let appended = entry(&sync, c1.tag());
    assert_eq!(appended.points.len(), 4);
    assert_eq!(appended.points.last(), Some(&DataPoint::new(3.0, 9.0)));

    collection.remove_by_tag(c1.tag()).expect("remove");
    assert_eq!(sync.with_widget(|chart| chart.curve_count()), 0);
    assert_eq!(c1.listener_count(), 0);
    assert_eq!(sync.stats().desyncs, 0);
}

#[test]
fn binding_attaches_existing_members() {
    let collection = CurveCollection::shared();
    let first = collection.push(Curve::from_y(&[1.0, 2.0])).expect("push");
    let second = collection.push(Curve::from_y(&[3.0])).expect("push");

    let sync = build_synchronizer();
    sync.bind(&collection);

    assert!(sync.is_bound());
    assert_eq!(sync.curves_count(), 2);
    assert_eq!(sync.attached_count(), 2);
    assert_eq!(
        sync.with_widget(|chart| chart.tags()),
        vec![first.tag().clone(), second.tag().clone()]
    );
}

#[test]
fn every_mutation_ends_with_rescale_and_repaint() {
    let sync = build_synchronizer();
    let collection = CurveCollection::shared();
    sync.bind(&collection);
    let counts = |sync: &Synchronizer| sync.with_widget(|chart| (chart.rescale_count(), chart.repaint_count()));

    let (rescales, repaints) = counts(&sync);
    let curve = collection.push(Curve::from_y(&[1.0, 2.0])).expect("push");
    assert_eq!(counts(&sync), (rescales + 1, repaints + 1));

    curve.set_visible(false);
    assert_eq!(counts(&sync), (rescales + 2, repaints + 2));

    curve.set_color(Color::GREEN);
    assert_eq!(counts(&sync), (rescales + 3, repaints + 3));
}

#[test]
fn point_count_change_settles_without_touching_entry() {
    let sync = build_synchronizer();
    let collection = CurveCollection::shared();
    sync.bind(&collection);
    let curve = collection.push(Curve::from_y(&[1.0, 2.0])).expect("push");
    let before = sync.stats();

    // One point-count change plus one append notification.
    curve.add_points([(2.0, 3.0)]);

    let after = sync.stats();
    assert_eq!(after.settles, before.settles + 2);
    assert_eq!(after.rebuilds, before.rebuilds + 1);
    assert_eq!(after.desyncs, 0);
}

#[test]
fn seeded_entry_uses_name_points_and_color_without_marker() {
    let sync = build_synchronizer();
    let collection = CurveCollection::shared();
    sync.bind(&collection);

    let curve = Curve::from_points([(0.0, 1.0), (1.0, 3.0)]);
    curve.set_name("Pressure");
    curve.set_color(Color::BLUE);
    curve.set_marker_type(MarkerType::Star);
    let curve = collection.push(curve).expect("push");

    let seeded = entry(&sync, curve.tag());
    assert_eq!(seeded.name, "Pressure");
    assert_eq!(seeded.color, Color::BLUE);
    assert_eq!(seeded.marker, MarkerType::None);
    assert_eq!(seeded.tag.as_ref(), Some(curve.tag()));
}

#[test]
fn repaint_reflects_visible_entries() {
    let sync = build_synchronizer();
    let collection = CurveCollection::shared();
    sync.bind(&collection);

    let curve = collection
        .push(Curve::from_xy(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).expect("curve"))
        .expect("push");
    let segments = |sync: &Synchronizer| {
        sync.with_widget(|chart| chart.last_frame().map(|frame| frame.segments.len()))
    };
    assert_eq!(segments(&sync), Some(2));

    curve.set_visible(false);
    assert_eq!(segments(&sync), Some(0));
    assert_eq!(sync.with_widget(|chart| chart.renderer().last_segment_count), 0);
}
