#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mviz_runtime::{Msg, ThemeMode, Viewport, Visualizer, VisualizerConfig};

#[derive(Debug, Arbitrary)]
enum Op {
    Play,
    Pause,
    Toggle,
    Step,
    Reset,
    SetRows(u8),
    SetSpeed(f64),
    Resize(f32, f32),
    Dark(bool),
    Elapse(u16),
    Frame,
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(mut v) = Visualizer::new(&VisualizerConfig::default()) else {
        return;
    };
    for op in ops {
        let msg = match op {
            Op::Play => Msg::Play,
            Op::Pause => Msg::Pause,
            Op::Toggle => Msg::Toggle,
            Op::Step => Msg::Step,
            Op::Reset => Msg::Reset,
            Op::SetRows(n) => Msg::SetRows(usize::from(n)),
            Op::SetSpeed(s) => Msg::SetSpeed(s),
            Op::Resize(w, h) => Msg::Resize(Viewport::new(w, h)),
            Op::Dark(dark) => Msg::SetTheme(if dark { ThemeMode::Dark } else { ThemeMode::Light }),
            Op::Elapse(ms) => {
                v.advance_time(Duration::from_millis(u64::from(ms)));
                continue;
            }
            Op::Frame => {
                let _ = v.frame();
                continue;
            }
        };
        let _ = v.update(msg);

        let c = v.controller();
        assert!(c.step_index() < c.total_steps() as i64);
        assert_eq!(c.is_playing(), c.live_epoch().is_some());
    }
});
