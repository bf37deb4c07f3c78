//! Dispatcher: routes queued commands to the actuators.

use crate::actuator::{ActuatorError, FireControl, MotorDriver, ServoDriver};
use crate::command::Command;
use crate::queue::Consumer;
use crate::record::CommandRecord;

/// Maps decoded commands onto actuator calls.
///
/// Pure routing: no retries, no buffering of actuator calls. Actuator
/// results are logged (with the `defmt` feature) and otherwise dropped.
pub struct Dispatcher<A> {
    actuators: A,
}

impl<A> Dispatcher<A>
where
    A: MotorDriver + ServoDriver + FireControl,
{
    /// Create a dispatcher driving the given actuators.
    pub fn new(actuators: A) -> Self {
        Self { actuators }
    }

    /// Take at most one record from the queue and dispatch it.
    ///
    /// Returns the command that ran, or `None` if the queue was empty.
    pub async fn poll<const C: usize>(&mut self, queue: &mut Consumer<'_, C>) -> Option<Command> {
        let record = queue.try_dequeue()?;
        Some(self.dispatch(record).await)
    }

    /// Decode and execute one record.
    pub async fn dispatch(&mut self, record: CommandRecord) -> Command {
        let command = Command::decode(&record);
        self.execute(command).await;
        command
    }

    /// Execute an already decoded command.
    pub async fn execute(&mut self, command: Command) {
        match command {
            Command::Halt => {
                for motor in 0..self.actuators.motor_count() {
                    report(command, self.actuators.set_motor_speed(motor, 0));
                }
            }
            Command::AdjustSpin { mode, offset } => {
                report(command, self.actuators.set_spin(mode, offset));
            }
            Command::AdjustSpeed { motor, speed } => {
                report(command, self.actuators.set_motor_speed(motor, speed));
            }
            Command::AdjustAngle { servo, angle } => {
                report(command, self.actuators.set_servo_angle(servo, angle));
            }
            Command::Launch { count } => {
                self.actuators.run_fire_sequence(count).await;
            }
            Command::Unknown(_opcode) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Ignoring unknown opcode {=u8:#x}", _opcode);
            }
        }
    }

    /// Get a reference to the actuators.
    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    /// Get a mutable reference to the actuators.
    pub fn actuators_mut(&mut self) -> &mut A {
        &mut self.actuators
    }

    /// Consume the dispatcher, returning the actuators.
    pub fn into_inner(self) -> A {
        self.actuators
    }
}

#[inline]
fn report(_command: Command, result: Result<(), ActuatorError>) {
    if let Err(_e) = result {
        #[cfg(feature = "defmt")]
        defmt::warn!("{:?} rejected: {:?}", _command, _e);
    }
}
