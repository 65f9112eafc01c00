//! Keeps serial I/O off the UI thread.
//!
//! The controller lives on a tokio worker task and runs each request on
//! the blocking pool. The UI posts [`Request`]s without waiting and picks
//! up the latest [`Panel`] when it next repaints.

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::watch;
use tracing::{Instrument, debug, error, warn};

use crate::command::Command;
use crate::controller::RobotController;
use crate::panel::Panel;
use crate::transport::Transport;

const REQUEST_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Press(Command),
    Reset,
}

/// UI-side handle to the serial worker. Dropping it stops the worker,
/// which in turn drops (and closes) the transport.
pub struct Link {
    requests: mpsc::Sender<Request>,
    panels: watch::Receiver<Panel>,
}

impl Link {
    /// Queue a button press. Returns `false` if the worker is busy or
    /// gone and the press was dropped.
    pub fn press(&self, cmd: Command) -> bool {
        self.submit(Request::Press(cmd))
    }

    pub fn reset(&self) -> bool {
        self.submit(Request::Reset)
    }

    fn submit(&self, request: Request) -> bool {
        match self.requests.try_send(request) {
            Ok(()) => true,
            Err(TrySendError::Full(request)) => {
                warn!(?request, "serial worker busy; request dropped");
                false
            }
            Err(TrySendError::Closed(request)) => {
                warn!(?request, "serial worker stopped; request dropped");
                false
            }
        }
    }

    /// Latest snapshot, if it changed since the last poll.
    pub fn poll(&mut self) -> Option<Panel> {
        match self.panels.has_changed() {
            Ok(true) => Some(self.panels.borrow_and_update().clone()),
            _ => None,
        }
    }

    /// Wait for the next snapshot. `None` once the worker has stopped.
    pub async fn next_panel(&mut self) -> Option<Panel> {
        self.panels.changed().await.ok()?;
        Some(self.panels.borrow_and_update().clone())
    }
}

/// Start the serial worker on `runtime`, handing it ownership of
/// `controller`. The worker runs inside the caller's current span.
pub fn spawn_link<T>(runtime: &Handle, controller: RobotController<T>) -> Link
where
    T: Transport + 'static,
{
    let (req_tx, req_rx) = mpsc::channel(REQUEST_CAPACITY);
    let (panel_tx, panel_rx) = watch::channel(controller.panel().clone());
    runtime.spawn(run_worker(controller, req_rx, panel_tx).in_current_span());
    Link {
        requests: req_tx,
        panels: panel_rx,
    }
}

async fn run_worker<T>(
    mut controller: RobotController<T>,
    mut requests: mpsc::Receiver<Request>,
    panels: watch::Sender<Panel>,
) where
    T: Transport + 'static,
{
    while let Some(request) = requests.recv().await {
        let joined = tokio::task::spawn_blocking(move || {
            let result = match request {
                Request::Press(cmd) => controller.dispatch(cmd),
                Request::Reset => {
                    controller.reset();
                    Ok(())
                }
            };
            (controller, result)
        })
        .await;
        let (returned, result) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                error!(error = %e, "serial worker task failed");
                return;
            }
        };
        controller = returned;
        if let Err(e) = result {
            error!(?request, error = %e, "serial request failed");
        }
        if panels.send(controller.panel().clone()).is_err() {
            break;
        }
    }
    debug!("serial worker stopped");
}
