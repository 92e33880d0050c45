use super::{Reading, ReadingSignal, prime};
use crate::hal::{Converter, DutyOutput, DynConverter, Input};
use crate::util::{debug, unwrap};
use alloc::boxed::Box;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

/// Configuration for the [`FreeRunning`] driver.
#[derive(Clone, Copy, Default)]
pub struct FreeRunningConfig {
    /// The input that is sampled.
    pub input: Input,
    /// Pause inserted after each conversion-complete event.
    pub interval: Option<Duration>,
    /// Signal on which each reading is published.
    pub readings: Option<&'static ReadingSignal>,
}

/// Mirrors one analog input onto one duty output.
///
/// The converter must be configured for free-running conversions: the
/// driver arms a single conversion at startup to start the chain and never
/// re-arms, the hardware restarts itself after every result.
pub struct FreeRunning<C, O> {
    converter: C,
    output: O,
}

impl<C, O> FreeRunning<C, O>
where
    C: Converter + 'static,
    O: DutyOutput + 'static,
{
    pub const fn new(converter: C, output: O) -> Self {
        Self { converter, output }
    }

    /// Arms the first conversion and spawns the driver task.
    pub fn run(self, config: FreeRunningConfig, spawner: Spawner) {
        let converter: Box<dyn DynConverter> = Box::new(self.converter);
        let output: Box<dyn DutyOutput> = Box::new(self.output);
        unwrap!(spawner.spawn(task(converter, output, config)));

        #[embassy_executor::task]
        async fn task(
            mut converter: Box<dyn DynConverter>,
            mut output: Box<dyn DutyOutput>,
            config: FreeRunningConfig,
        ) {
            prime(converter.as_mut(), config.input);
            loop {
                service(converter.as_mut(), output.as_mut(), &config).await;
                if let Some(interval) = config.interval {
                    Timer::after(interval).await;
                }
            }
        }
    }
}

/// Consumes one conversion-complete event.
///
/// The result goes straight into the duty output. No selector mutation, no
/// re-arm.
async fn service(
    converter: &mut dyn DynConverter,
    output: &mut dyn DutyOutput,
    config: &FreeRunningConfig,
) {
    let value = converter.complete().await;
    output.set_duty(value);
    debug!("input {}: {}", config.input, value);
    if let Some(signal) = config.readings {
        signal.signal(Reading {
            input: config.input,
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{MockConverter, MockDuty};
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn results_propagate_in_order_without_selector_writes() {
        let config = FreeRunningConfig::default();
        let mut converter = MockConverter::with_results(Some(Input::A), [0, 255, 128]);
        let mut output = MockDuty::default();
        for _ in 0..3 {
            block_on(service(&mut converter, &mut output, &config));
        }
        assert_eq!(output.writes, [0, 255, 128]);
        assert!(converter.selects().is_empty());
    }

    #[test]
    fn events_issue_no_explicit_rearm() {
        let config = FreeRunningConfig::default();
        let mut converter = MockConverter::with_results(Some(Input::A), [17, 18]);
        let mut output = MockDuty::default();
        for _ in 0..2 {
            block_on(service(&mut converter, &mut output, &config));
        }
        assert_eq!(converter.armed(), 0);
    }

    #[test]
    fn startup_arms_the_chain_once() {
        let config = FreeRunningConfig::default();
        let mut converter = MockConverter::with_results(Some(Input::A), [5]);
        let mut output = MockDuty::default();
        prime(&mut converter, config.input);
        block_on(service(&mut converter, &mut output, &config));
        assert_eq!(converter.armed(), 1);
        assert_eq!(converter.selects(), [Input::A]);
        assert_eq!(output.writes, [5]);
    }

    #[test]
    fn readings_carry_the_configured_input() {
        static READINGS: ReadingSignal = ReadingSignal::new();
        let config = FreeRunningConfig {
            input: Input::B,
            readings: Some(&READINGS),
            ..Default::default()
        };
        let mut converter = MockConverter::with_results(Some(Input::B), [200]);
        let mut output = MockDuty::default();
        block_on(service(&mut converter, &mut output, &config));
        assert_eq!(
            READINGS.try_take(),
            Some(Reading {
                input: Input::B,
                value: 200
            })
        );
    }
}
