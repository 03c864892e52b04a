//! Whack-a-mole controller core.
//!
//! A tick-driven state machine that reads eight momentary buttons, lights one
//! "mole" segment on a 7-segment digit, scores correct hits and ends the round
//! after a fixed number of ticks. Everything is integer-only and allocation-free
//! on the tick path so the same code can run on a microcontroller.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod constants;
pub mod controller;
pub mod debounce;
pub mod display;
pub mod error;
pub mod input;
pub mod rng;
pub mod score;
pub mod sim;
pub mod target;
pub mod timers;

pub use constants::Timing;
pub use controller::{tick, Controller, ControllerState, RoundState, TickOutput};
pub use error::RuleCode;
pub use input::{ButtonVector, TickInput};
pub use sim::{replay, replay_strict, ReplayResult, ReplayViolation};
pub use target::{RotatingTargets, ScriptedTargets, TargetIndex, TargetSource, XorshiftTargets};
