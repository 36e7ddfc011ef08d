use std::io;
use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use instrument_ui::{
    EngineRegistry, ExitSignal, InputEvent, Key, RouterServices, Size, TransportState, UiRouter,
    UiRuntime,
};

fn services(exit: Arc<ExitSignal>) -> RouterServices {
    RouterServices {
        engines: Arc::new(EngineRegistry::with_panel_engines()),
        transport: Arc::new(TransportState::new()),
        exit,
    }
}

fn router() -> UiRouter {
    UiRouter::new(services(Arc::new(ExitSignal::new())))
}

fn key_dispatch(c: &mut Criterion) {
    let mut router = router();
    router.select_engine("Synth").expect("engine");
    c.bench_function("router_key_dispatch", |b| {
        b.iter(|| {
            router.keypress(black_box(Key::Rec)).expect("press");
            router.keypress(black_box(Key::WhiteUp)).expect("rotary");
            router.keyrelease(black_box(Key::Rec)).expect("release");
        });
    });
}

fn engine_switching(c: &mut Criterion) {
    let mut router = router();
    let cycle = [Key::Tape, Key::Mixer, Key::Synth, Key::Drums, Key::Metronome];
    c.bench_function("router_engine_switching", |b| {
        b.iter(|| {
            for key in cycle {
                router.keypress(black_box(key)).expect("press");
                router.keyrelease(key).expect("release");
            }
        });
    });
}

fn scripted_session(c: &mut Criterion) {
    let script: Vec<InputEvent> = [Key::Synth, Key::Rec, Key::BlueDown, Key::Drums, Key::Play]
        .into_iter()
        .flat_map(|key| [InputEvent::Press(key), InputEvent::Release(key)])
        .collect();

    c.bench_function("runtime_scripted_session", |b| {
        b.iter(|| {
            let exit = Arc::new(ExitSignal::new());
            let router = UiRouter::new(services(exit.clone()));
            let mut runtime = UiRuntime::new(router, exit, Size::new(80, 24));
            let mut sink = io::sink();
            runtime
                .run_scripted(&mut sink, black_box(script.clone()))
                .expect("scripted run");
        });
    });
}

criterion_group!(benches, key_dispatch, engine_switching, scripted_session);
criterion_main!(benches);
