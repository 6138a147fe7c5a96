mod common;

use common::synthetic_scene::{
    Rect, SyntheticScene, ASPHALT, DEPTH_SCALE, GREY_GREEN, PARK_GREEN, TEAL,
};
use sandbox_terrain::classifier::{RoadParams, ShadowParams};
use sandbox_terrain::image::{ChannelOrder, ColorImage, DepthImage};
use sandbox_terrain::{classify, ClassifierParams, FrameError, TerrainClass, TerrainClassifier};

const BLOCK: Rect = Rect::new(52, 36, 76, 60);

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn town() -> SyntheticScene {
    SyntheticScene::flat(160, 120, 300)
        .raise(BLOCK, 50)
        .paint(Rect::new(10, 96, 150, 108), ASPHALT)
        .paint(Rect::new(100, 10, 140, 40), PARK_GREEN)
}

#[test]
fn town_scene_is_split_into_disjoint_classes() {
    init_logger();
    let scene = town();
    let masks = classify(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, None)
        .expect("well-formed frame");

    assert!(masks.is_disjoint(), "class masks must not overlap");
    let (bx, by) = BLOCK.centre();
    assert!(masks.building.get(bx, by), "block centre should be a building");
    assert!(masks.road.get(80, 102), "road strip should be detected");
    assert!(masks.park.get(120, 25), "park patch should be detected");
    assert!(!masks.building.get(10, 10) && !masks.road.get(10, 10) && !masks.park.get(10, 10));

    assert_eq!(masks.road.count(), 140 * 12);
    let labels = masks.label_map();
    assert_eq!(labels.get(bx, by), TerrainClass::Building);
    assert_eq!(labels.get(80, 102), TerrainClass::Road);
    assert_eq!(labels.get(120, 25), TerrainClass::Park);
}

#[test]
fn frame_without_valid_depth_reports_nothing() {
    init_logger();
    let scene = town().invalidate(Rect::new(0, 0, 160, 120));
    let classifier = TerrainClassifier::default();
    let report = classifier
        .classify_with_diagnostics(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, None)
        .expect("no signal is not an error");
    assert!(report.masks.is_empty());
    assert!(report.trace.height.no_signal);
    assert!(!report.summary.has_signal);
    assert!(report.trace.building.is_none() && report.trace.conflict.is_none());
}

#[test]
fn flat_frame_has_no_buildings() {
    init_logger();
    let scene = SyntheticScene::flat(96, 72, 420);
    let classifier = TerrainClassifier::default();
    let report = classifier
        .classify_with_diagnostics(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, None)
        .expect("well-formed frame");
    assert!(report.trace.height.degenerate_range);
    assert!(!report.masks.building.any());
    assert!(report.masks.is_empty());
}

#[test]
fn raised_area_larger_than_any_building_is_rejected() {
    init_logger();
    let scene = SyntheticScene::flat(240, 240, 300).raise(Rect::new(50, 50, 190, 190), 50);
    let report = TerrainClassifier::default()
        .classify_with_diagnostics(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, None)
        .expect("well-formed frame");
    assert!(!report.masks.building.any());
    let building = report.trace.building.expect("building stage ran");
    assert!(building.candidate_pixels > 0);
    assert_eq!(building.regions.kept, 0);
}

#[test]
fn building_detection_ignores_plateaus_and_slopes() {
    init_logger();
    let flat = SyntheticScene::flat(128, 96, 300).raise(BLOCK, 50);
    let plateau = SyntheticScene::flat(128, 96, 400).raise(BLOCK, 50);
    // 1 mm per pixel ramp, 12.7 cm across the frame.
    let slope = SyntheticScene::flat(128, 96, 300)
        .tilt(|x, _| x as u16)
        .raise(BLOCK, 50);

    let reference = classify(&flat.depth_view(), &flat.color_view(), DEPTH_SCALE, None)
        .expect("well-formed frame");
    assert!(reference.building.any());
    for (name, scene) in [("plateau", &plateau), ("slope", &slope)] {
        let masks = classify(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, None)
            .expect("well-formed frame");
        assert_eq!(
            masks.building, reference.building,
            "building mask changed on the {name}"
        );
    }
}

#[test]
fn parks_need_both_colour_criteria() {
    init_logger();
    let patch = Rect::new(30, 20, 70, 50);
    for (rgb, expected) in [(PARK_GREEN, true), (GREY_GREEN, false), (TEAL, false)] {
        let scene = SyntheticScene::flat(100, 70, 300).paint(patch, rgb);
        let masks = classify(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, None)
            .expect("well-formed frame");
        let (cx, cy) = patch.centre();
        assert_eq!(masks.park.get(cx, cy), expected, "park decision for {rgb:?}");
        if !expected {
            assert!(!masks.park.any(), "{rgb:?} must not produce any park pixel");
        }
    }
}

#[test]
fn invalid_depth_suppresses_colour_classes() {
    init_logger();
    let patch = Rect::new(30, 20, 70, 50);
    let hole = Rect::new(30, 20, 50, 50);
    let scene = SyntheticScene::flat(100, 70, 300)
        .paint(patch, PARK_GREEN)
        .invalidate(hole);
    let masks = classify(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, None)
        .expect("well-formed frame");
    assert!(masks.park.get(60, 35));
    for y in hole.y0..hole.y1 {
        for x in hole.x0..hole.x1 {
            assert!(!masks.park.get(x, y), "park at invalid pixel ({x}, {y})");
        }
    }
}

#[test]
fn dark_block_stays_a_building_where_a_road_crosses_it() {
    init_logger();
    let scene = SyntheticScene::flat(128, 96, 300)
        .raise(BLOCK, 50)
        .paint(Rect::new(4, 44, 124, 52), ASPHALT);
    let mut params = ClassifierParams::default();
    params.shadow = ShadowParams {
        fragment_max_area: 400,
        ..ShadowParams::default()
    };
    let masks = TerrainClassifier::new(params)
        .classify(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, None)
        .expect("well-formed frame");
    assert!(masks.building.get(64, 48));
    assert!(!masks.road.get(64, 48));
    assert_eq!(masks.road.overlap(&masks.building), 0);
    assert!(masks.road.get(20, 48) && masks.road.get(110, 48));
}

#[test]
fn shadow_sliver_is_dropped_but_long_road_survives() {
    init_logger();
    let block = Rect::new(60, 40, 84, 64);
    let sliver = Rect::new(86, 37, 94, 67);
    let strip = Rect::new(47, 10, 55, 110);
    let scene = SyntheticScene::flat(160, 120, 300)
        .raise(block, 50)
        .paint(sliver, ASPHALT)
        .paint(strip, ASPHALT);
    let mut params = ClassifierParams::default();
    params.road = RoadParams {
        min_area: 100,
        ..RoadParams::default()
    };
    params.shadow = ShadowParams {
        halo_kernel: 15,
        fragment_max_area: 300,
    };
    let report = TerrainClassifier::new(params)
        .classify_with_diagnostics(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, None)
        .expect("well-formed frame");

    let shadow = report.trace.shadow.as_ref().expect("shadow stage ran");
    assert_eq!(shadow.fragments_removed, 1);
    assert_eq!(shadow.pixels_removed, sliver.area());
    assert!(!report.masks.road.get(90, 50), "sliver should be treated as shadow");
    assert_eq!(report.masks.road.count(), strip.area());
}

#[test]
fn malformed_frames_are_rejected() {
    init_logger();
    let depth = vec![300u16; 12];
    let rgb = vec![0u8; 12 * 3];

    let err = classify(
        &DepthImage::new(4, 3, &depth),
        &ColorImage::new(3, 4, ChannelOrder::Rgb, &rgb),
        DEPTH_SCALE,
        None,
    );
    assert_eq!(
        err,
        Err(FrameError::DimensionMismatch {
            depth: (4, 3),
            color: (3, 4)
        })
    );

    let err = classify(
        &DepthImage::new(0, 3, &depth),
        &ColorImage::new(0, 3, ChannelOrder::Rgb, &rgb),
        DEPTH_SCALE,
        None,
    );
    assert!(matches!(err, Err(FrameError::EmptyFrame { .. })));

    let err = classify(
        &DepthImage::new(4, 3, &depth),
        &ColorImage::new(4, 3, ChannelOrder::Rgb, &rgb[..20]),
        DEPTH_SCALE,
        None,
    );
    assert!(matches!(err, Err(FrameError::BufferTooSmall { .. })));

    let err = classify(
        &DepthImage::new(4, 3, &depth),
        &ColorImage::new(4, 3, ChannelOrder::Rgb, &rgb),
        -1.0,
        None,
    );
    assert_eq!(err, Err(FrameError::InvalidDepthScale(-1.0)));
}

#[test]
fn repeated_and_concurrent_calls_agree() {
    init_logger();
    let scene = town();
    let classifier = TerrainClassifier::default();
    let first = classifier
        .classify(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, Some(0.9))
        .expect("well-formed frame");
    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..3)
            .map(|_| {
                s.spawn(|| {
                    classifier.classify(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, None)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect()
    });
    for masks in results {
        assert_eq!(masks.expect("well-formed frame"), first);
    }
}

#[test]
fn report_serializes_as_camel_case_json() {
    init_logger();
    let scene = town();
    let report = TerrainClassifier::default()
        .classify_with_diagnostics(&scene.depth_view(), &scene.color_view(), DEPTH_SCALE, Some(0.9))
        .expect("well-formed frame");
    let json = serde_json::to_value(&report).expect("serializable report");
    assert!(json["summary"]["buildingPixels"].as_u64().unwrap_or(0) > 0);
    assert_eq!(json["trace"]["input"]["baselineDistanceM"], 0.9f32 as f64);
    assert!(json["trace"]["timings"]["stages"].as_array().map_or(0, |s| s.len()) >= 6);
    assert!(report.trace.timings.stage_ms("buildings").is_some());
    assert!(json.get("masks").is_none());
}
