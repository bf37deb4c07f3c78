#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::{info, unwrap};
use defmt_rtt as _;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART1;
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{Config as UartConfig, Uart};
use static_cell::StaticCell;
use wheelium_firmware::{
    build_launcher, slice_config, CommandQueue, ControlConfig, ControlLoop, DriveConfig,
    LinkConfig, PwmTiming, SerialLink, WheeliumLauncher, QUEUE_CAPACITY,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
});

/// Link task executor; preempts the control loop.
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

/// Command queue shared by the link task (producer) and control loop (consumer).
static QUEUE: StaticCell<CommandQueue<QUEUE_CAPACITY>> = StaticCell::new();

type Link = SerialLink<'static, 'static, QUEUE_CAPACITY>;
type Control = ControlLoop<'static, 'static, WheeliumLauncher<'static>, QUEUE_CAPACITY>;

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[entry]
fn main() -> ! {
    info!("Sir Wheelium III starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let queue = QUEUE.init(CommandQueue::new());
    let (producer, consumer) = queue.split();

    // --- UART Setup ---
    let link_config = LinkConfig::DEFAULT;
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = link_config.baudrate;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (_tx, rx) = uart.split();
    let link = SerialLink::new(rx, producer, &link_config);

    // --- PWM Setup ---
    let servo_pwm = slice_config(&PwmTiming::SERVO);
    let motor_pwm = slice_config(&PwmTiming::MOTOR);
    info!(
        "PWM: motors {=u32} Hz, servos {=u32} Hz",
        PwmTiming::MOTOR.frequency(),
        PwmTiming::SERVO.frequency()
    );

    let loader = Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, servo_pwm.clone());
    let aim = Pwm::new_output_ab(p.PWM_SLICE2, p.PIN_4, p.PIN_5, servo_pwm);
    let motors = Pwm::new_output_ab(p.PWM_SLICE3, p.PIN_6, p.PIN_7, motor_pwm);
    let launcher = unwrap!(build_launcher(motors, loader, aim, &DriveConfig::default()));

    // Heartbeat (on-board LED on Pico)
    let led = Output::new(p.PIN_25, Level::Low);
    let control = ControlLoop::new(launcher, consumer, led, &ControlConfig::DEFAULT);

    // High priority: UART receive and framing
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    unwrap!(spawner.spawn(link_task(link)));

    info!("Sir Wheelium III initialized, waiting for commands...");

    // Thread mode: dispatch
    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(|spawner| {
        unwrap!(spawner.spawn(control_task(control)));
    })
}

/// Link task - assembles UART bytes into queued commands.
#[embassy_executor::task]
async fn link_task(mut link: Link) {
    link.run().await
}

/// Control task - dispatches queued commands and blinks the heartbeat.
#[embassy_executor::task]
async fn control_task(mut control: Control) {
    control.run().await
}
