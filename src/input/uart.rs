use defmt::{debug, trace, warn};
use embassy_rp::uart::{Async, Error as UartError, UartRx};
use embassy_time::{with_timeout, Duration};
use launcher_core::{FrameAssembler, Ingest, LinkConfig, Producer, RxEvent};

/// UART receive errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum LinkError {
    Framing,
    Break,
    Overrun,
    Parity,
    Io,
}

impl From<UartError> for LinkError {
    fn from(e: UartError) -> Self {
        match e {
            UartError::Framing => LinkError::Framing,
            UartError::Break => LinkError::Break,
            UartError::Overrun => LinkError::Overrun,
            UartError::Parity => LinkError::Parity,
            _ => LinkError::Io,
        }
    }
}

/// Serial command link: turns UART bytes into queued command records.
///
/// Bytes are read one at a time. While a frame is partially assembled each
/// read is bounded by the idle window; if it expires the line is idle and
/// the partial frame is dropped. With nothing pending the link simply waits
/// for the next byte.
///
/// # Pins
///
/// Uses UART1 by default:
/// - GPIO 8: TX (unused)
/// - GPIO 9: RX
pub struct SerialLink<'d, 'q, const C: usize> {
    rx: UartRx<'d, Async>,
    producer: Producer<'q, C>,
    assembler: FrameAssembler,
    idle_window: Duration,
}

impl<'d, 'q, const C: usize> SerialLink<'d, 'q, C> {
    pub fn new(rx: UartRx<'d, Async>, producer: Producer<'q, C>, config: &LinkConfig) -> Self {
        Self {
            rx,
            producer,
            assembler: FrameAssembler::new(),
            idle_window: Duration::from_micros(config.idle_window_micros()),
        }
    }

    /// Wait for the next byte or idle-line event.
    pub async fn next_event(&mut self) -> Result<RxEvent, LinkError> {
        let mut byte = [0u8; 1];

        if self.assembler.pending_len() == 0 {
            self.rx.read(&mut byte).await?;
            return Ok(RxEvent::Byte(byte[0]));
        }

        match with_timeout(self.idle_window, self.rx.read(&mut byte)).await {
            Ok(read) => {
                read?;
                Ok(RxEvent::Byte(byte[0]))
            }
            Err(_) => Ok(RxEvent::Idle),
        }
    }

    /// Receive forever.
    ///
    /// A UART error discards the partial frame, the same as an idle line.
    pub async fn run(&mut self) -> ! {
        loop {
            let event = match self.next_event().await {
                Ok(event) => event,
                Err(e) => {
                    warn!("UART error: {:?}", e);
                    RxEvent::Idle
                }
            };

            match self.assembler.ingest(event, &mut self.producer) {
                Ingest::Partial => {}
                Ingest::Queued(record) => {
                    trace!("Queued {:?}", record);
                }
                Ingest::Overflow(record) => {
                    warn!(
                        "Command queue full, dropped {:?} ({=u32} total)",
                        record,
                        self.producer.dropped()
                    );
                }
                Ingest::Resync { discarded } => {
                    debug!("Line idle, discarded {=usize} byte(s)", discarded);
                }
            }
        }
    }
}
