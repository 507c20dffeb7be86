use criterion::{black_box, criterion_group, criterion_main, Criterion};
use filmreel_core::{
    Config, HeroSnapshot, Inputs, MountInfo, PageController, PageEvent, SectionBox, SectionKind,
    Size,
};

fn mounted() -> PageController {
    let mut page = PageController::new(Config::default()).expect("default config");
    page.mount(MountInfo {
        canvas: Some(Size::new(1920.0, 1080.0)),
        animation_section: true,
        sections: vec![
            SectionKind::Plain,
            SectionKind::Skills { markers: 12 },
            SectionKind::Achievements {
                targets: vec![50, 120, 8],
            },
        ],
    });
    let loads = (0..384)
        .map(|index| PageEvent::FrameLoaded {
            index,
            width: 1920.0,
            height: 1080.0,
        })
        .collect();
    page.update(0.0, Inputs::new(loads));
    page
}

fn bench_scroll_tick(c: &mut Criterion) {
    let section = SectionBox {
        top: 1080.0,
        height: 4000.0,
    };
    let hero = HeroSnapshot {
        layer_speeds: vec![Some(0.2), Some(0.5), None],
    };
    c.bench_function("scroll_tick_burst_of_4", |b| {
        let mut page = mounted();
        let mut y = 0.0;
        b.iter(|| {
            y = (y + 37.0) % 6000.0;
            let events = (0..4)
                .map(|k| PageEvent::Scroll {
                    scroll_y: y + k as f64,
                    window_height: 1080.0,
                    hero: Some(hero.clone()),
                    section: Some(section),
                })
                .collect();
            black_box(page.update(y, Inputs::new(events)).changes.len());
        });
    });
}

criterion_group!(benches, bench_scroll_tick);
criterion_main!(benches);
