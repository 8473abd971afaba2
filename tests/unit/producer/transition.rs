use super::*;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::{gpu::device::SoftwareDevice, producer::core::tests::ScriptedProducer};

fn info(kind: TransitionKind, duration: u32) -> TransitionInfo {
    TransitionInfo {
        kind,
        direction: TransitionDirection::FromLeft,
        duration,
    }
}

fn transition_over(
    device: &Arc<SoftwareDevice>,
    kind: TransitionKind,
    duration: u32,
    source_markers: &[i16],
    dest_markers: &[i16],
) -> TransitionProducer {
    let dest = ScriptedProducer::boxed(device, dest_markers, "dest");
    let mut transition = TransitionProducer::new(Some(dest), info(kind, duration)).unwrap();
    transition.initialize(&VideoFormatDesc::hd720p50()).unwrap();
    transition.set_leading_producer(ScriptedProducer::boxed(device, source_markers, "source"));
    transition
}

#[test]
fn debug_output_reports_the_descriptor() {
    let device = Arc::new(SoftwareDevice::new());
    let transition = transition_over(&device, TransitionKind::Mix, 4, &[1], &[2]);
    let rendered = format!("{transition:?}");
    assert!(rendered.contains("Mix"));
    assert!(rendered.contains("current_frame"));
}

#[test]
fn missing_destination_fails_at_construction() {
    let err = TransitionProducer::new(None, info(TransitionKind::Mix, 10)).unwrap_err();
    assert!(matches!(err, OnairError::Validation(_)));
}

#[test]
fn zero_duration_fails_at_construction() {
    let device = Arc::new(SoftwareDevice::new());
    let dest = ScriptedProducer::boxed(&device, &[1], "dest");
    let err = TransitionProducer::new(Some(dest), info(TransitionKind::Mix, 0)).unwrap_err();
    assert!(matches!(err, OnairError::Validation(_)));
}

#[test]
fn initialize_reaches_the_destination() {
    let device = Arc::new(SoftwareDevice::new());
    let dest = ScriptedProducer::boxed(&device, &[1], "dest");
    let inits = dest.initialized.clone();
    let mut transition = TransitionProducer::new(Some(dest), info(TransitionKind::Mix, 4)).unwrap();
    transition.initialize(&VideoFormatDesc::hd720p50()).unwrap();
    assert_eq!(inits.load(Ordering::SeqCst), 1);
}

#[test]
fn mix_alpha_ramps_to_one_then_ends_exactly_once() {
    let device = Arc::new(SoftwareDevice::new());
    let duration = 4u32;
    let mut transition = transition_over(
        &device,
        TransitionKind::Mix,
        duration,
        &[1; 8],
        &[2; 8],
    );

    let mut alphas = Vec::new();
    for _ in 0..duration {
        let frame = transition.render_frame().unwrap().unwrap();
        let children = frame.children();
        assert_eq!(children.len(), 2);
        // Destination is painted over the source.
        alphas.push(children[1].transform().alpha);
    }
    assert_eq!(alphas, vec![0.25, 0.5, 0.75, 1.0]);

    assert!(transition.render_frame().unwrap().is_none());
    assert!(transition.render_frame().unwrap().is_none());
}

#[test]
fn audio_is_cross_faded_between_the_sides() {
    let device = Arc::new(SoftwareDevice::new());
    // One-sample buffers make the mixed composite audio easy to predict.
    let mut transition =
        transition_over(&device, TransitionKind::Mix, 4, &[1000; 8], &[2000; 8]);

    // Tick 1: alpha 0.25, so source contributes 750 and destination 500.
    let frame = transition.render_frame().unwrap().unwrap();
    assert_eq!(frame.audio_data(), &[1250]);

    // Tick 2: alpha 0.5, both sides at half volume.
    let frame = transition.render_frame().unwrap().unwrap();
    assert_eq!(frame.audio_data(), &[1500]);
}

#[test]
fn cut_passes_the_source_through_unchanged() {
    let device = Arc::new(SoftwareDevice::new());
    let mut transition =
        transition_over(&device, TransitionKind::Cut, 3, &[700; 8], &[2000; 8]);

    for _ in 0..3 {
        let frame = transition.render_frame().unwrap().unwrap();
        // No compositing, no alpha, no volume scaling.
        assert!(frame.children().is_empty());
        assert_eq!(frame.audio_data(), &[700]);
        assert_eq!(frame.transform().alpha, 1.0);
    }
    assert!(transition.render_frame().unwrap().is_none());
}

#[test]
fn push_moves_both_sides() {
    let device = Arc::new(SoftwareDevice::new());
    let mut transition =
        transition_over(&device, TransitionKind::Push, 2, &[1; 4], &[2; 4]);

    let frame = transition.render_frame().unwrap().unwrap();
    let children = frame.children();
    assert_eq!(children[0].transform().pos.x, 0.5);
    assert_eq!(children[1].transform().pos.x, -0.5);
}

#[test]
fn wipe_narrows_the_destination_uv() {
    let device = Arc::new(SoftwareDevice::new());
    let mut transition =
        transition_over(&device, TransitionKind::Wipe, 4, &[1; 8], &[2; 8]);

    let frame = transition.render_frame().unwrap().unwrap();
    let dest = &frame.children()[1];
    assert_eq!(dest.transform().pos.x, -0.75);
    assert_eq!(dest.transform().uv.x0, -0.75);
    assert_eq!(dest.transform().uv.x1, 0.25);
}

#[test]
fn ended_source_hands_off_to_its_follower_mid_transition() {
    let device = Arc::new(SoftwareDevice::new());
    let follower = ScriptedProducer::boxed(&device, &[9; 8], "follower");
    let follower_inits = follower.initialized.clone();
    let mut source = ScriptedProducer::boxed(&device, &[1], "source");
    source.following = Some(follower);

    let dest = ScriptedProducer::boxed(&device, &[2; 8], "dest");
    let mut transition =
        TransitionProducer::new(Some(dest), info(TransitionKind::Cut, 4)).unwrap();
    transition.initialize(&VideoFormatDesc::hd720p50()).unwrap();
    transition.set_leading_producer(source);

    // Tick 1 comes from the original source, ticks 2..4 from its follower,
    // with no gap and no duplicate at the boundary.
    let mut markers = Vec::new();
    for _ in 0..4 {
        let frame = transition.render_frame().unwrap().unwrap();
        markers.push(frame.audio_data()[0]);
    }
    assert_eq!(markers, vec![1, 9, 9, 9]);
    assert_eq!(follower_inits.load(Ordering::SeqCst), 1);
}

#[test]
fn failing_source_is_swallowed_and_the_show_goes_on() {
    let device = Arc::new(SoftwareDevice::new());
    let mut source = ScriptedProducer::boxed(&device, &[1; 8], "source");
    source.fail_render = true;

    let dest = ScriptedProducer::boxed(&device, &[2; 8], "dest");
    let mut transition =
        TransitionProducer::new(Some(dest), info(TransitionKind::Mix, 4)).unwrap();
    transition.initialize(&VideoFormatDesc::hd720p50()).unwrap();
    transition.set_leading_producer(source);

    let frame = transition.render_frame().unwrap().unwrap();
    // Only the destination contributes; the empty source placeholder is
    // dropped by the composite.
    assert_eq!(frame.children().len(), 1);
}

#[test]
fn following_producer_is_the_destination() {
    let device = Arc::new(SoftwareDevice::new());
    let mut transition = transition_over(&device, TransitionKind::Mix, 1, &[1], &[2]);
    assert!(transition.render_frame().unwrap().is_some());
    assert!(transition.render_frame().unwrap().is_none());
    assert!(transition.take_following_producer().is_some());
}

#[test]
fn parse_accepts_kind_params_and_rejects_garbage() {
    let params = serde_json::json!({ "duration": 12, "direction": "from_right" });
    let info = parse_transition("Wipe", &params).unwrap();
    assert_eq!(info.kind, TransitionKind::Wipe);
    assert_eq!(info.direction, TransitionDirection::FromRight);
    assert_eq!(info.duration, 12);

    let defaulted = parse_transition("mix", &serde_json::json!({ "duration": 1 })).unwrap();
    assert_eq!(defaulted.direction, TransitionDirection::FromLeft);

    assert!(parse_transition("dissolve", &serde_json::json!({ "duration": 1 })).is_err());
    assert!(parse_transition("mix", &serde_json::json!({})).is_err());
    assert!(parse_transition("mix", &serde_json::json!({ "duration": 0 })).is_err());
    assert!(parse_transition("mix", &serde_json::json!(42)).is_err());
}
