//! Pen actuator control.

use crate::client::EbbClient;
use crate::config::EbbConfig;
use plot_core::command::Command;
use plot_core::error::PlotResult;
use plot_core::limits::PEN_SETTLE;
use tracing::{debug, instrument};

/// Raises and lowers the drawing implement.
///
/// Both operations are idempotent: no up/down state is tracked, and the
/// servo accepts redundant position commands. Each command is followed by
/// the settle delay so the pen has physically arrived before the next
/// motion command goes out.
pub struct PenActuator {
    client: EbbClient,
    up_position: u16,
    down_position: u16,
}

impl PenActuator {
    pub fn new(client: EbbClient, config: &EbbConfig) -> Self {
        Self {
            client,
            up_position: config.pen_up_position,
            down_position: config.pen_down_position,
        }
    }

    /// Lift the pen off the drawing surface.
    #[instrument(skip(self), err)]
    pub async fn pen_up(&self) -> PlotResult<()> {
        debug!(position = self.up_position, "lifting pen");
        self.set_position(self.up_position).await
    }

    /// Lower the pen into ink contact.
    #[instrument(skip(self), err)]
    pub async fn pen_down(&self) -> PlotResult<()> {
        debug!(position = self.down_position, "lowering pen");
        self.set_position(self.down_position).await
    }

    async fn set_position(&self, position: u16) -> PlotResult<()> {
        self.client
            .send(&Command::SetPenPosition { position })
            .await?;
        tokio::time::sleep(PEN_SETTLE).await;
        Ok(())
    }
}
