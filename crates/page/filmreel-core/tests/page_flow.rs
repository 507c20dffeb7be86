use approx::assert_relative_eq;
use filmreel_core::{
    Change, Config, CoreEvent, DrawPlan, DrawRect, FrameSurface, HeroSnapshot, Inputs,
    MountInfo, PageController, PageError, PageEvent, SectionBox, Size,
};
use filmreel_test_fixtures::scenarios;
use serde::Deserialize;

const SECTION: SectionBox = SectionBox {
    top: 1000.0,
    height: 4000.0,
};
const WINDOW: f64 = 1000.0;

fn mounted() -> PageController {
    let mut page = PageController::new(Config::default()).unwrap();
    page.mount(MountInfo {
        canvas: Some(Size::new(1280.0, 720.0)),
        animation_section: true,
        sections: vec![],
    });
    page
}

fn hero_scroll(scroll_y: f64, layers: Vec<Option<f32>>) -> PageEvent {
    PageEvent::Scroll {
        scroll_y,
        window_height: WINDOW,
        hero: Some(HeroSnapshot {
            layer_speeds: layers,
        }),
        section: Some(SECTION),
    }
}

fn section_scroll(scroll_y: f64) -> PageEvent {
    PageEvent::Scroll {
        scroll_y,
        window_height: WINDOW,
        hero: None,
        section: Some(SECTION),
    }
}

fn loaded(index: usize) -> PageEvent {
    PageEvent::FrameLoaded {
        index,
        width: 1920.0,
        height: 1080.0,
    }
}

fn hero_text(changes: &[Change]) -> Option<(f32, f32)> {
    changes.iter().find_map(|c| match c {
        Change::HeroText {
            translate_y,
            opacity,
        } => Some((*translate_y, *opacity)),
        _ => None,
    })
}

#[test]
fn parallax_opacity_fades_linearly() {
    let mut page = mounted();
    let mut previous = f32::INFINITY;
    let mut s = 0.0;
    while s < WINDOW {
        let out = page.update(s, Inputs::new(vec![hero_scroll(s, vec![Some(0.3), None])]));
        let (offset, opacity) = hero_text(&out.changes).expect("hero text styled");
        assert_relative_eq!(opacity, 1.0 - (s / WINDOW) as f32, epsilon = 1e-6);
        assert_relative_eq!(offset, s as f32 * 0.4, epsilon = 1e-3);
        assert!(opacity < previous);
        previous = opacity;
        s += 50.0;
    }
}

#[test]
fn layers_use_their_own_speed() {
    let mut page = mounted();
    let out = page.update(0.0, Inputs::new(vec![hero_scroll(200.0, vec![Some(0.3), None])]));
    let layers: Vec<(usize, f32)> = out
        .changes
        .iter()
        .filter_map(|c| match c {
            Change::LayerTransform { layer, translate_y } => Some((*layer, *translate_y)),
            _ => None,
        })
        .collect();
    assert_eq!(layers.len(), 2);
    assert_relative_eq!(layers[0].1, 60.0, epsilon = 1e-4);
    assert_relative_eq!(layers[1].1, 100.0, epsilon = 1e-4);
}

#[test]
fn parallax_idle_past_hero() {
    let mut page = mounted();
    for s in [WINDOW, WINDOW + 1.0, 3.0 * WINDOW] {
        let out = page.update(0.0, Inputs::new(vec![hero_scroll(s, vec![Some(1.0)])]));
        assert!(out.changes.iter().all(|c| !matches!(
            c,
            Change::LayerTransform { .. } | Change::HeroText { .. }
        )));
    }
}

#[test]
fn missing_hero_skips_parallax_only() {
    let mut page = mounted();
    page.update(0.0, Inputs::new(vec![loaded(0)]));
    let out = page.update(16.0, Inputs::new(vec![section_scroll(1000.0 + 1500.0)]));
    assert!(hero_text(&out.changes).is_none());
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, CoreEvent::CursorMoved { .. })));
}

#[test]
fn first_frame_draws_on_load() {
    let mut page = mounted();
    let out = page.update(0.0, Inputs::new(vec![loaded(1), loaded(2)]));
    assert_eq!(out.draws().count(), 0);
    let out = page.update(16.0, Inputs::new(vec![loaded(0)]));
    assert!(out.events.contains(&CoreEvent::FirstFrameReady));
    let plans: Vec<&DrawPlan> = out.draws().collect();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].frame, 0);
    assert_relative_eq!(plans[0].dest.width, 1280.0, epsilon = 1e-9);
    assert_relative_eq!(plans[0].dest.height, 720.0, epsilon = 1e-9);
}

#[test]
fn scroll_bursts_coalesce_into_one_draw() {
    let mut page = mounted();
    let events: Vec<PageEvent> = (0..384).map(loaded).collect();
    page.update(0.0, Inputs::new(events));

    let burst = vec![
        section_scroll(1100.0),
        section_scroll(1500.0),
        section_scroll(2500.0),
    ];
    let out = page.update(16.0, Inputs::new(burst));
    let plans: Vec<&DrawPlan> = out.draws().collect();
    assert_eq!(plans.len(), 1);
    // 1500 / 3000 * 384
    assert_eq!(plans[0].frame, 192);
    assert!(!page.needs_tick());

    let out = page.update(32.0, Inputs::new(vec![section_scroll(2500.0)]));
    assert_eq!(out.draws().count(), 0);
}

#[test]
fn resize_redraws_current_frame() {
    let mut page = mounted();
    page.update(0.0, Inputs::new((0..384).map(loaded).collect()));
    page.update(16.0, Inputs::new(vec![section_scroll(1300.0)]));

    let out = page.update(
        32.0,
        Inputs::new(vec![PageEvent::Resize {
            canvas: Size::new(640.0, 640.0),
        }]),
    );
    let plan = out.draws().next().expect("redraw after resize");
    assert_eq!(plan.frame, 38);
    assert_eq!(plan.canvas, Size::new(640.0, 640.0));
    assert_relative_eq!(plan.dest.y, 140.0, epsilon = 1e-9);
    assert_eq!(page.canvas_size(), Size::new(640.0, 640.0));
}

#[derive(Deserialize)]
struct MissingFrame {
    canvas: Size,
    image: Size,
    failed: Vec<FailedRef>,
}

#[derive(Deserialize)]
struct FailedRef {
    sequence: usize,
    index: usize,
}

#[derive(Default)]
struct Recorder {
    frames: Vec<usize>,
}

impl FrameSurface for Recorder {
    fn fill_rect(&mut self, _color: &str, _rect: DrawRect) -> Result<(), PageError> {
        Ok(())
    }
    fn draw_frame(&mut self, frame: usize, _rect: DrawRect) -> Result<(), PageError> {
        self.frames.push(frame);
        Ok(())
    }
    fn set_blend_mode(&mut self, _mode: &str) -> Result<(), PageError> {
        Ok(())
    }
}

#[test]
fn failed_frame_does_not_affect_neighbours() {
    let scenario: MissingFrame = scenarios::load("missing-frame").expect("fixture");
    let cfg = Config::default();
    let per_seq = cfg.sequences[0].count;
    let failed: Vec<usize> = scenario
        .failed
        .iter()
        .map(|f| f.sequence * per_seq + f.index)
        .collect();
    assert_eq!(failed, vec![197]);

    let mut page = PageController::new(cfg).unwrap();
    page.mount(MountInfo {
        canvas: Some(scenario.canvas),
        animation_section: true,
        sections: vec![],
    });
    let events = (0..384)
        .map(|i| {
            if failed.contains(&i) {
                PageEvent::FrameFailed { index: i }
            } else {
                PageEvent::FrameLoaded {
                    index: i,
                    width: scenario.image.width,
                    height: scenario.image.height,
                }
            }
        })
        .collect();
    let out = page.update(0.0, Inputs::new(events));
    assert!(out.events.contains(&CoreEvent::FrameMissing {
        sequence: 1,
        index: 5
    }));
    assert!(out.events.contains(&CoreEvent::AllFramesSettled {
        loaded: 383,
        failed: 1
    }));

    let player = page.player().unwrap();
    for i in (192..=196).chain(198..=210).chain(0..5) {
        assert!(player.draw_plan(i, scenario.canvas).is_some(), "frame {i}");
    }
    assert!(player.draw_plan(197, scenario.canvas).is_none());

    let mut recorder = Recorder::default();
    for i in [196, 197, 198] {
        if let Some(plan) = player.draw_plan(i, scenario.canvas) {
            plan.execute(&mut recorder).unwrap();
        }
    }
    assert_eq!(recorder.frames, vec![196, 198]);
}

#[test]
fn outputs_serialize_for_hosts() {
    let mut page = mounted();
    let out = page.update(0.0, Inputs::new(vec![loaded(0)]));
    let json = serde_json::to_value(out).unwrap();
    assert!(json["changes"][0]["Draw"]["frame"].is_number());
    assert_eq!(json["events"][0], serde_json::json!("FirstFrameReady"));
}
