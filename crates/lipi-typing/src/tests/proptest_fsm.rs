//! Property-based tests for the TypingContext state machine.
//!
//! Generates random key, idle and reset sequences via proptest and checks
//! that replaying every diff reproduces the whole-string conversion of
//! each uninterrupted run of keys.

use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::{bulk, fixed_settings, window_bound};
use crate::{TypingContext, TypingContextSettings};

// ---------------------------------------------------------------------------
// Action enum: every caller-facing operation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Action {
    Type(char),
    /// Let time pass before the next key.
    Idle(u64),
    Clear,
}

// ---------------------------------------------------------------------------
// Strategy: weighted random Action generation
// ---------------------------------------------------------------------------

fn arb_key() -> impl Strategy<Value = char> {
    // Vowels at higher weight for realistic syllables
    prop_oneof![
        3 => Just('a'),
        2 => Just('A'),
        2 => Just('i'),
        2 => Just('u'),
        2 => Just('e'),
        2 => Just('o'),
        1 => prop::sample::select(vec!['I', 'U', 'E', 'O', 'R', 'M', 'H']),
        4 => prop::sample::select(vec![
            'k', 'g', 'c', 'j', 't', 'd', 'n', 'p', 'b', 'm', 'y', 'r', 'l', 'v', 's', 'h',
            'S', 'N', 'T', 'D', 'L', 'G', 'J', 'f', 'z', 'w', 'x',
        ]),
        1 => prop::sample::select(vec!['.', '~', '1', '0', ' ', '\'', '_', '-']),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        40 => arb_key().prop_map(Action::Type),
        3 => prop::sample::select(vec![10u64, 1000, 4500, 4501, 60_000]).prop_map(Action::Idle),
        1 => Just(Action::Clear),
    ]
}

fn arb_script() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "Devanagari",
        "Bengali",
        "Gurumukhi",
        "Tamil",
        "Telugu",
        "Malayalam",
        "Sinhala",
        "Romanized",
        "Normal",
    ])
}

// ---------------------------------------------------------------------------
// Reference model: committed output plus the keys of the current run
// ---------------------------------------------------------------------------

struct Model {
    script: &'static str,
    settings: TypingContextSettings,
    committed: String,
    run: String,
    last_key_at: Option<Instant>,
}

impl Model {
    fn expected(&self) -> String {
        format!(
            "{}{}",
            self.committed,
            bulk(&self.run, self.script, &self.settings)
        )
    }

    fn end_run(&mut self) {
        let rendered = bulk(&self.run, self.script, &self.settings);
        self.committed.push_str(&rendered);
        self.run.clear();
        self.last_key_at = None;
    }
}

// ---------------------------------------------------------------------------
// Execute an Action against context and model
// ---------------------------------------------------------------------------

fn execute_action(
    ctx: &mut TypingContext,
    model: &mut Model,
    out: &mut String,
    now: &mut Instant,
    action: &Action,
) {
    match action {
        Action::Type(ch) => {
            if let Some(last) = model.last_key_at {
                if now.duration_since(last) > model.settings.auto_clear_timeout() {
                    model.end_run();
                }
            }
            let before = ctx.rendered.chars().count();
            let diff = ctx.take_key_input_at(&ch.to_string(), *now);
            assert!(
                diff.delete_count <= before,
                "delete_count {} exceeds rendered length {} after {:?}",
                diff.delete_count,
                before,
                action,
            );
            diff.apply(out);
            model.run.push(*ch);
            model.last_key_at = Some(*now);
        }
        Action::Idle(ms) => *now += Duration::from_millis(*ms),
        Action::Clear => {
            ctx.clear_context();
            model.end_run();
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant checks: run after every action
// ---------------------------------------------------------------------------

fn assert_invariants(ctx: &TypingContext, model: &Model, out: &str, action: &Action) {
    // 1. Replayed diffs equal the whole-string conversion.
    assert_eq!(
        out,
        model.expected(),
        "replay diverged after {:?} (run {:?})",
        action,
        model.run,
    );

    // 2. The caller's buffer ends with what the context would re-render.
    assert!(
        out.ends_with(&ctx.rendered),
        "rendered suffix {:?} not at end of {:?} after {:?}",
        ctx.rendered,
        out,
        action,
    );

    // 3. Pending keys stay bounded.
    assert!(
        ctx.raw.len() <= window_bound(ctx),
        "raw window {:?} exceeds bound after {:?}",
        ctx.raw,
        action,
    );
}

// ---------------------------------------------------------------------------
// proptest entry point
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn typing_replay_matches_bulk(
        script in arb_script(),
        actions in prop::collection::vec(arb_action(), 1..100),
    ) {
        let settings = fixed_settings();
        let mut ctx = TypingContext::new(script, Some(settings)).unwrap();
        let mut model = Model {
            script,
            settings,
            committed: String::new(),
            run: String::new(),
            last_key_at: None,
        };
        let mut out = String::new();
        let mut now = Instant::now();
        for action in &actions {
            execute_action(&mut ctx, &mut model, &mut out, &mut now, action);
            assert_invariants(&ctx, &model, &out, action);
        }
    }

    #[test]
    fn typing_replay_matches_bulk_with_settings(
        script in arb_script(),
        native in any::<bool>(),
        inherent in any::<bool>(),
        keys in prop::collection::vec(arb_key(), 1..60),
    ) {
        let settings = fixed_settings()
            .with_use_native_numerals(native)
            .with_include_inherent_vowel(inherent);
        let mut ctx = TypingContext::new(script, Some(settings)).unwrap();
        let now = Instant::now();
        let mut out = String::new();
        for ch in &keys {
            ctx.take_key_input_at(&ch.to_string(), now).apply(&mut out);
            prop_assert!(ctx.raw.len() <= window_bound(&ctx));
        }
        let typed: String = keys.iter().collect();
        prop_assert_eq!(out, bulk(&typed, script, &settings));
    }
}
