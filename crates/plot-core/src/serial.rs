//! Async serial port abstractions for the plotter driver.
//!
//! The driver never names a concrete port type. Anything implementing
//! `AsyncRead + AsyncWrite` can stand in:
//!
//! - `tokio_serial::SerialStream` (real hardware)
//! - `tokio::io::DuplexStream` (tests)
//!
//! # Types
//!
//! - [`SerialPortIO`]: trait alias combining the async I/O traits
//! - [`DynSerial`]: type-erased boxed serial port
//! - [`ConnectionHandle`]: the shared, closeable handle the protocol client
//!   operates on
//!
//! A [`ConnectionHandle`] holds `Option<BufReader<DynSerial>>` behind a
//! mutex: `BufReader` gives line-delimited reads for the ASCII protocol,
//! and the `Option` makes disconnection observable everywhere — once the
//! slot is emptied, every clone of the handle fails with `NotConnected`
//! instead of quietly reopening the device.

use crate::error::{PlotError, PlotResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, BufReader};
use tokio::sync::Mutex;

/// Trait alias for async serial port I/O.
pub trait SerialPortIO: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> SerialPortIO for T {}

/// Type-erased boxed serial port.
pub type DynSerial = Box<dyn SerialPortIO>;

/// Shared handle to an open (or already closed) serial connection.
///
/// Lifecycle: created by `wrap_handle` at connect time, emptied at
/// disconnect. Operations on an emptied handle fail with
/// [`PlotError::NotConnected`].
pub type ConnectionHandle = Arc<Mutex<Option<BufReader<DynSerial>>>>;

/// Wrap a freshly opened port into a [`ConnectionHandle`].
pub fn wrap_handle(port: DynSerial) -> ConnectionHandle {
    Arc::new(Mutex::new(Some(BufReader::new(port))))
}

/// Open a serial port with the board's standard settings (8N1, no flow
/// control).
///
/// The open happens on the blocking thread pool; port initialization can
/// stall for long enough to matter on an async runtime.
pub async fn open_serial_async(port_path: &str, baud_rate: u32) -> PlotResult<tokio_serial::SerialStream> {
    use tokio::task::spawn_blocking;
    use tokio_serial::SerialPortBuilderExt;

    let path = port_path.to_string();
    let opened = spawn_blocking(move || {
        tokio_serial::new(&path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
    })
    .await
    .map_err(|e| PlotError::Connect {
        port: port_path.to_string(),
        message: format!("blocking open task failed: {e}"),
    })?;

    opened.map_err(|e| PlotError::Connect {
        port: port_path.to_string(),
        message: e.to_string(),
    })
}

/// Read and discard whatever is sitting in the port's input buffer.
///
/// The controller emits a greeting banner after its post-open reset; stale
/// bytes left in the buffer would otherwise be misread as the response to
/// the first real command. Returns the number of bytes discarded.
pub async fn drain_serial_buffer<R: AsyncRead + Unpin>(port: &mut R, timeout_ms: u64) -> usize {
    let mut discard = [0u8; 256];
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    let mut total = 0usize;

    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        match tokio::time::timeout(remaining, port.read(&mut discard)).await {
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => total += n,
            Ok(Err(_)) => break,
            Err(_) => break,
        }
    }

    if total > 0 {
        tracing::debug!(bytes = total, "discarded stale serial data");
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn handle_reads_line_delimited_responses() {
        let (mut host, device) = tokio::io::duplex(64);
        let handle = wrap_handle(Box::new(device));

        host.write_all(b"OK\r\n").await.unwrap();

        let mut guard = handle.lock().await;
        let reader = guard.as_mut().unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line.trim(), "OK");
    }

    #[tokio::test]
    async fn emptied_handle_is_observable_from_clones() {
        let (_host, device) = tokio::io::duplex(64);
        let handle = wrap_handle(Box::new(device));
        let clone = handle.clone();

        handle.lock().await.take();
        assert!(clone.lock().await.is_none());
    }

    #[tokio::test]
    async fn drain_discards_stale_bytes() {
        let (mut host, mut device) = tokio::io::duplex(64);
        host.write_all(b"EBBv13_and_above\r\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let discarded = drain_serial_buffer(&mut device, 50).await;
        assert_eq!(discarded, 18);
    }
}
