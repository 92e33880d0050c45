//! Dimmer is a firmware framework for driving PWM outputs from analog dials.
//!
//! A potentiometer position is sampled through an analog-to-digital
//! converter and mirrored, unmodified, onto the duty cycle of a PWM
//! output. The hardware is reached only through the handle traits in
//! [`hal`], so the drivers in [`sampler`] run unchanged on real silicon
//! and in host tests.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[cfg(test)]
use critical_section as _;

pub mod hal;
pub mod mcu;
pub mod sampler;
pub mod util;

pub use hal::{Converter, DutyOutput, Input};
pub use sampler::{
    FreeRunning, FreeRunningConfig, Reading, ReadingSignal, RoundRobin, RoundRobinConfig,
};
