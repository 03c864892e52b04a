//! End-to-end rounds driven only through the raw tick interface: a reset, a
//! button byte per tick, and the display/score bytes read back.

use mole_core::{Controller, ScriptedTargets, TargetSource, TickInput, Timing, XorshiftTargets};

const TIMING: Timing = Timing::SIMULATION;

struct Bench<S = XorshiftTargets> {
    controller: Controller<S>,
    display: u8,
    score: u8,
}

impl Bench {
    fn after_reset(seed: u32) -> Self {
        Self::with_source(XorshiftTargets::new(seed))
    }
}

impl Bench<ScriptedTargets> {
    fn scripted(moles: &[u8]) -> Self {
        let source = ScriptedTargets::from_indices(moles)
            .expect("moles in range")
            .expect("at least one mole");
        Self::with_source(source)
    }
}

impl<S: TargetSource> Bench<S> {
    fn with_source(source: S) -> Self {
        let mut bench = Self {
            controller: Controller::with_source(TIMING, source),
            display: 0,
            score: 0,
        };
        bench.apply(TickInput::RESET);
        bench.clock(1);
        bench
    }

    fn apply(&mut self, input: TickInput) {
        let output = self
            .controller
            .step_checked(input)
            .unwrap_or_else(|rule| panic!("rule {rule} broken"));
        self.display = output.display;
        self.score = output.score;
    }

    fn drive(&mut self, buttons: u8, ticks: u32) {
        for _ in 0..ticks {
            self.apply(TickInput::buttons(buttons));
        }
    }

    fn clock(&mut self, ticks: u32) {
        self.drive(0, ticks);
    }

    fn dp(&self) -> u8 {
        (self.display >> 7) & 1
    }

    fn dark_segments(&self) -> Vec<u8> {
        (0..7).filter(|i| (self.display >> i) & 1 == 0).collect()
    }

    /// Clocks until the play pattern shows exactly one mole.
    fn wait_active(&mut self, max_ticks: u32) -> u8 {
        for _ in 0..max_ticks {
            self.clock(1);
            let dark = self.dark_segments();
            if self.dp() == 1 && dark.len() == 1 {
                return dark[0];
            }
        }
        panic!("no active mole within {max_ticks} ticks; display={:08b}", self.display);
    }

    fn hit(&mut self, index: u8) {
        self.drive(1 << index, 5);
        self.clock(3);
    }

    fn wait_game_over(&mut self, max_ticks: u32) -> bool {
        for _ in 0..max_ticks {
            self.clock(1);
            if self.dp() == 0 {
                return true;
            }
        }
        false
    }
}

#[test]
fn auto_start_lights_one_segment() {
    let bench = Bench::after_reset(1);
    assert_eq!(bench.dp(), 1);
    assert_eq!(bench.dark_segments().len(), 1);
    assert_eq!(bench.score, 0);
}

#[test]
fn stable_press_on_the_mole_scores() {
    let mut bench = Bench::after_reset(2);
    let mole = bench.wait_active(20);
    bench.hit(mole);
    assert_eq!(bench.score, 1);
}

#[test]
fn two_hits_keep_the_play_pattern() {
    let mut bench = Bench::after_reset(3);
    for _ in 0..2 {
        let mole = bench.wait_active(20);
        bench.hit(mole);
    }
    assert_eq!(bench.score, 2);

    bench.clock(1);
    assert_eq!(bench.dark_segments().len(), 1);
    assert_eq!(bench.dp(), 1);
}

#[test]
fn single_tick_wrong_press_changes_nothing() {
    let mut bench = Bench::after_reset(4);
    bench.clock(5);
    let mole = bench.dark_segments()[0];
    let wrong = (mole + 1) % 8;

    bench.drive(1 << wrong, 1);
    bench.clock(1);
    assert_eq!(bench.score, 0);
}

#[test]
fn two_tick_glitch_is_filtered() {
    let mut bench = Bench::after_reset(5);
    let mole = bench.wait_active(20);
    bench.drive(1 << mole, 2);
    bench.clock(5);
    assert_eq!(bench.score, 0);
}

#[test]
fn wrong_press_then_lockout_then_recovery() {
    let mut bench = Bench::after_reset(6);
    let mole = bench.wait_active(20);
    let wrong = (mole + 1) % 8;

    bench.drive(1 << wrong, 5);
    bench.clock(1);
    bench.drive(1 << mole, 5);
    bench.clock(1);
    assert_eq!(bench.score, 0, "lockout failed");

    bench.clock(TIMING.lock_cycles() + 2);
    bench.drive(1 << mole, 5);
    bench.clock(1);
    assert_eq!(bench.score, 1, "lockout did not clear");
}

#[test]
fn consecutive_wrong_presses_on_different_buttons() {
    let mut bench = Bench::after_reset(7);
    let mole = bench.wait_active(20);
    let wrong1 = (mole + 1) % 8;
    let wrong2 = (mole + 2) % 8;

    for wrong in [wrong1, wrong2] {
        bench.drive(1 << wrong, 5);
        bench.clock(1);
    }
    bench.drive(1 << mole, 5);
    bench.clock(1);
    assert_eq!(bench.score, 0);

    bench.clock(12);
    bench.drive(1 << mole, 5);
    bench.clock(1);
    assert_eq!(bench.score, 1);
}

#[test]
fn wrong_presses_wrapping_onto_button_zero_still_lock_out() {
    let mut bench = Bench::scripted(&[6, 2]);
    let mole = bench.wait_active(20);
    assert_eq!(mole, 6);
    let wrong1 = (mole + 1) % 8;
    let wrong2 = (mole + 2) % 8;
    assert_eq!((wrong1, wrong2), (7, 0));

    for wrong in [wrong1, wrong2] {
        bench.drive(1 << wrong, 5);
        bench.clock(1);
    }
    bench.drive(1 << mole, 5);
    bench.clock(1);
    assert_eq!(bench.score, 0);
    assert_eq!(bench.dp(), 1);

    bench.clock(12);
    bench.drive(1 << mole, 5);
    bench.clock(1);
    assert_eq!(bench.score, 1);
}

#[test]
fn score_is_held_for_lock_cycles_after_a_wrong_press() {
    let mut bench = Bench::scripted(&[3, 5]);
    // Button 4 debounces on the fourth tick and arms the lockout.
    bench.drive(1 << 4, 4);

    // Switching to 3 debounces it exactly LOCK_CYCLES ticks later.
    bench.drive(1 << 4, TIMING.lock_cycles() - 4);
    bench.drive(1 << 3, 4);
    assert_eq!(bench.score, 0);

    let mut bench = Bench::scripted(&[3, 5]);
    bench.drive(1 << 4, 4);
    bench.drive(1 << 4, TIMING.lock_cycles() - 3);
    bench.drive(1 << 3, 4);
    assert_eq!(bench.score, 1);
}

#[test]
fn button_zero_mid_game_keeps_score_and_round() {
    let mut bench = Bench::after_reset(8);
    for _ in 0..2 {
        let mole = bench.wait_active(20);
        bench.hit(mole);
    }
    assert_eq!(bench.score, 2);

    bench.drive(1, 5);
    bench.clock(25);
    assert_eq!(bench.score, 2);
    assert_eq!(bench.dp(), 1);
}

#[test]
fn three_hits_then_game_over_holds_the_score() {
    let mut bench = Bench::after_reset(9);
    for expected in 1..=3 {
        let mole = bench.wait_active(20);
        bench.hit(mole);
        assert_eq!(bench.score, expected);
    }

    assert!(bench.wait_game_over(2_000));
    for _ in 0..100 {
        bench.clock(1);
        assert_eq!(bench.dp(), 0, "dp rose after game over");
    }
    assert_eq!(bench.score, 3);
    assert_eq!(bench.display & 0x7F, 0b011_0000);
}

#[test]
fn decimal_point_tracks_the_round() {
    let mut bench = Bench::after_reset(10);
    for _ in 0..10 {
        bench.clock(1);
        assert_eq!(bench.dp(), 1);
    }
    assert!(bench.wait_game_over(2_000));
    bench.clock(50);
    assert_eq!(bench.dp(), 0);
}

#[test]
fn restart_ignores_glitch_and_accepts_debounced_press() {
    let mut bench = Bench::after_reset(11);
    assert!(bench.wait_game_over(2_000));

    bench.drive(1, 2);
    bench.clock(1);
    assert_eq!(bench.display & 0x7F, 0b100_0000, "glitch restarted the round");
    assert_eq!(bench.dp(), 0);

    bench.drive(1, 4);
    bench.clock(1);
    let mole = bench.wait_active(20);
    assert!(mole <= 6);
    assert_eq!(bench.score, 0);
}

#[test]
fn fifty_moles_never_use_segment_seven() {
    let mut controller = Controller::with_source(TIMING, XorshiftTargets::new(12));
    let mut seen = [false; 8];

    for _ in 0..50 {
        let dark = !controller.output().display & 0x7F;
        assert_eq!(dark.count_ones(), 1);
        let mole = dark.trailing_zeros() as u8;
        seen[mole as usize] = true;

        for _ in 0..5 {
            controller.step_buttons(1 << mole);
        }
        for _ in 0..3 {
            controller.step_buttons(0);
        }
    }

    assert_eq!(controller.score(), 50);
    assert!(!seen[7]);
}
