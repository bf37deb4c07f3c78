//! Test doubles for PWM channels and delays.

extern crate std;

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};
use embedded_hal_async::delay::DelayNs;
use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

/// One observable hardware action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Duty(u8, u16),
    WaitMs(u32),
}

pub type Log = Rc<RefCell<Vec<Step>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Debug)]
pub struct MockPwmError;

impl embedded_hal::pwm::Error for MockPwmError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// PWM channel that remembers its duty and optionally logs writes.
pub struct MockPwm {
    pub id: u8,
    pub max: u16,
    pub duty: u16,
    pub fail: bool,
    log: Option<Log>,
}

impl MockPwm {
    pub fn new(id: u8, max: u16) -> Self {
        Self {
            id,
            max,
            duty: u16::MAX,
            fail: false,
            log: None,
        }
    }

    pub fn logged(id: u8, max: u16, log: &Log) -> Self {
        Self {
            log: Some(log.clone()),
            ..Self::new(id, max)
        }
    }
}

impl ErrorType for MockPwm {
    type Error = MockPwmError;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockPwmError);
        }
        self.duty = duty;
        if let Some(log) = &self.log {
            log.borrow_mut().push(Step::Duty(self.id, duty));
        }
        Ok(())
    }
}

/// Delay that returns immediately and logs the requested time.
pub struct MockDelay {
    log: Log,
}

impl MockDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Step::WaitMs(ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Step::WaitMs(ms));
    }
}

// Helper to run a future to completion (simple blocking executor)
pub(crate) fn block_on<F: Future>(mut f: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);

    // SAFETY: We don't move f after pinning
    let mut f = unsafe { Pin::new_unchecked(&mut f) };

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {
                panic!("Mock future returned Pending unexpectedly");
            }
        }
    }
}
