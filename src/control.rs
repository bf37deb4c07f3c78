//! Main control loop: one queued command per iteration, then a heartbeat.

use crate::config::ControlConfig;
use defmt::debug;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Timer};
use launcher_core::{Consumer, Dispatcher, FireControl, MotorDriver, ServoDriver};

/// Polls the command queue and drives the actuators.
///
/// A launch command blocks the loop until its fire sequence has finished;
/// commands arriving meanwhile wait in the queue.
pub struct ControlLoop<'d, 'q, A, const C: usize> {
    dispatcher: Dispatcher<A>,
    consumer: Consumer<'q, C>,
    led: Output<'d>,
    heartbeat: Duration,
    blink_every: u32,
    ticks: u32,
}

impl<'d, 'q, A, const C: usize> ControlLoop<'d, 'q, A, C>
where
    A: MotorDriver + ServoDriver + FireControl,
{
    pub fn new(
        actuators: A,
        consumer: Consumer<'q, C>,
        led: Output<'d>,
        config: &ControlConfig,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(actuators),
            consumer,
            led,
            heartbeat: config.heartbeat,
            blink_every: config.blink_every.max(1),
            ticks: 0,
        }
    }

    /// Run one iteration: dispatch at most one command, tick the heartbeat.
    pub async fn step(&mut self) {
        if let Some(command) = self.dispatcher.poll(&mut self.consumer).await {
            debug!("Dispatched {:?}", command);
        }

        self.ticks += 1;
        if self.ticks >= self.blink_every {
            self.ticks = 0;
            self.led.toggle();
        }
        Timer::after(self.heartbeat).await;
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }
}
