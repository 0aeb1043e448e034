//! Integration tests for scene update and serialization.

use inflight_scene::{
    FrameUpdater, Layout, Palette, SceneState, TemplateVertex, Vertex, VisualTemplate,
    WaveAnimator,
};

fn wave_updater(layout: Layout) -> FrameUpdater {
    FrameUpdater::new(
        VisualTemplate::triangle(64.0),
        layout,
        Box::new(WaveAnimator::default()),
    )
    .unwrap()
}

#[test]
fn test_serialization_is_byte_identical() {
    let updater = wave_updater(Layout::fixed(50));
    let mut state = updater.generate(1024, 768);
    updater.update(&mut state, 0.05);

    // Dirty the second region first so leftovers would show up
    let mut first = vec![0u8; updater.region_size()];
    let mut second = vec![0xAAu8; updater.region_size()];

    updater.serialize(&state, &mut first).unwrap();
    updater.serialize(&state, &mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_entity_major_ordering() {
    let template = VisualTemplate::new(vec![
        TemplateVertex::new([-1.0, 0.0], VisualTemplate::WHITE),
        TemplateVertex::new([0.0, 1.0], VisualTemplate::WHITE),
        TemplateVertex::new([1.0, 0.0], VisualTemplate::WHITE),
    ])
    .unwrap();
    let palette = Palette::new(vec![[1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]]).unwrap();
    let updater = FrameUpdater::new(
        template,
        Layout::fixed(2).with_spacing(100.0).with_palette(palette),
        Box::new(WaveAnimator::default()),
    )
    .unwrap();

    let state = updater.generate(640, 480);
    let mut region = vec![0u8; updater.region_size()];
    let written = updater.serialize(&state, &mut region).unwrap();
    assert_eq!(written, 6);

    let vertices = Vertex::read_stream(&region, written);
    // Entity 0 at x = -100, entity 1 at x = 0, both still at their origin
    let expected = vec![
        Vertex::new([-101.0, 0.0], [1.0, 0.0, 0.0, 1.0]),
        Vertex::new([-100.0, 1.0], [1.0, 0.0, 0.0, 1.0]),
        Vertex::new([-99.0, 0.0], [1.0, 0.0, 0.0, 1.0]),
        Vertex::new([-1.0, 0.0], [0.0, 0.0, 1.0, 1.0]),
        Vertex::new([0.0, 1.0], [0.0, 0.0, 1.0, 1.0]),
        Vertex::new([1.0, 0.0], [0.0, 0.0, 1.0, 1.0]),
    ];
    assert_eq!(vertices, expected);
}

#[test]
fn test_resize_regeneration_is_deterministic() {
    let updater = wave_updater(Layout::density(1_000));

    let mut a = updater.generate(320, 200);
    let mut b = SceneState::default();
    updater.update(&mut a, 0.3);

    updater.regenerate(&mut a, 1280, 720);
    updater.regenerate(&mut b, 1280, 720);
    assert_eq!(a.entities(), b.entities());
    assert_eq!(a.len(), 81);

    // Clock survives a resize
    assert!((a.time() - 0.3).abs() < 1e-6);
}

#[test]
fn test_resize_changes_entity_count() {
    let updater = wave_updater(Layout::density(1_000));
    let mut state = updater.generate(160, 100);
    assert_eq!(state.len(), 11);

    updater.regenerate(&mut state, 320, 100);
    assert_eq!(state.len(), 21);

    // Capped by the slot capacity
    updater.regenerate(&mut state, 1_000_000, 100);
    assert_eq!(state.len(), 1_000);
}

#[test]
fn test_wave_moves_entities_between_frames() {
    let updater = wave_updater(Layout::fixed(6));
    let mut state = updater.generate(800, 600);

    updater.update(&mut state, 0.05);
    let before: Vec<[f32; 2]> = state.entities().iter().map(|e| e.position).collect();
    updater.update(&mut state, 0.05);
    let after: Vec<[f32; 2]> = state.entities().iter().map(|e| e.position).collect();

    assert_ne!(before, after);
    assert!(before.iter().zip(&after).all(|(b, a)| b[0] == a[0]));
}
