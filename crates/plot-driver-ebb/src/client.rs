//! Protocol client: owns the serial connection and frames commands.

use crate::config::EbbConfig;
use plot_core::command::{Command, Dialect};
use plot_core::error::{PlotError, PlotResult};
use plot_core::limits::{DRAIN_TIMEOUT_MS, FIRMWARE_RESET_SETTLE};
use plot_core::serial::{drain_serial_buffer, wrap_handle, ConnectionHandle, DynSerial};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tracing::{info, instrument, warn};

/// Client for one plotter board.
///
/// Cheap to clone: clones share the same underlying connection, and
/// [`disconnect`](EbbClient::disconnect) closes it for all of them. Any
/// operation after close fails with [`PlotError::NotConnected`]; the port
/// is never silently reopened.
#[derive(Clone)]
pub struct EbbClient {
    handle: ConnectionHandle,
    dialect: Dialect,
    timeout: Duration,
    port_name: String,
}

impl EbbClient {
    /// Open the configured serial port and prepare it for commands.
    ///
    /// Opening the port resets the controller; the client waits out the
    /// firmware's reset interval and drains whatever banner bytes it left
    /// in the input buffer, so the first command's response is read clean.
    pub async fn connect(config: &EbbConfig) -> PlotResult<Self> {
        let port = plot_core::serial::open_serial_async(&config.port, config.baud).await?;
        let handle = wrap_handle(Box::new(port));

        tokio::time::sleep(FIRMWARE_RESET_SETTLE).await;
        if let Some(reader) = handle.lock().await.as_mut() {
            drain_serial_buffer(reader.get_mut(), DRAIN_TIMEOUT_MS).await;
        }

        info!(port = %config.port, baud = config.baud, "connected to plotter");
        Ok(Self {
            handle,
            dialect: config.dialect,
            timeout: Duration::from_millis(config.timeout_ms),
            port_name: config.port.clone(),
        })
    }

    /// Build a client over an already-open transport.
    ///
    /// This is the seam for in-memory transports: anything wrapped into a
    /// [`ConnectionHandle`] (a `tokio::io::duplex` end in tests, say) works
    /// in place of real hardware. No settle wait or drain is performed.
    pub fn with_handle(port: DynSerial, dialect: Dialect, timeout: Duration) -> Self {
        Self {
            handle: wrap_handle(port),
            dialect,
            timeout,
            port_name: "<in-memory>".to_string(),
        }
    }

    /// The dialect commands are encoded with.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Send one command and read its one-line response.
    pub async fn send(&self, command: &Command) -> PlotResult<String> {
        self.send_with_timeout(command, self.timeout).await
    }

    /// Send one command with an explicit read budget (homing needs more
    /// time than the default).
    ///
    /// Write, flush, and read failures are explicit errors naming the
    /// encoded command. A response other than `OK` is not an error: it is
    /// logged as a warning and returned, and the caller applies its own
    /// policy.
    #[instrument(skip(self, command), fields(port = %self.port_name))]
    pub async fn send_with_timeout(&self, command: &Command, timeout: Duration) -> PlotResult<String> {
        let wire = command.encode(&self.dialect);
        let label = wire.trim_end_matches('\r').to_string();

        let mut guard = self.handle.lock().await;
        let reader = guard.as_mut().ok_or(PlotError::NotConnected)?;

        reader
            .get_mut()
            .write_all(wire.as_bytes())
            .await
            .map_err(|source| PlotError::Io {
                command: label.clone(),
                source,
            })?;
        reader
            .get_mut()
            .flush()
            .await
            .map_err(|source| PlotError::Io {
                command: label.clone(),
                source,
            })?;

        let mut line = String::new();
        let read = tokio::time::timeout(timeout, reader.read_line(&mut line))
            .await
            .map_err(|_| PlotError::Timeout {
                command: label.clone(),
            })?
            .map_err(|source| PlotError::Io {
                command: label.clone(),
                source,
            })?;
        if read == 0 {
            return Err(PlotError::UnexpectedEof { command: label });
        }

        let response = line.trim().to_string();
        if response != "OK" {
            warn!(command = %label, response = %response, "unexpected acknowledgement");
        }
        Ok(response)
    }

    /// Close the connection. Idempotent; safe to call any number of times.
    pub async fn disconnect(&self) {
        if self.handle.lock().await.take().is_some() {
            info!(port = %self.port_name, "disconnected from plotter");
        }
    }

    /// Whether the connection is still open.
    pub async fn is_connected(&self) -> bool {
        self.handle.lock().await.is_some()
    }
}
