use std::time::Duration;

use tracing::{debug, info};

use crate::command::Command;
use crate::mood::Mood;
use crate::panel::{Layout, Panel};
use crate::transport::{Transport, TransportError};

/// Drives the rover over an owned [`Transport`] and keeps the [`Panel`]
/// in step with what was sent and heard.
///
/// Replies are read with a single availability check: if nothing is
/// waiting at that moment, nothing is read and the panel is left alone.
pub struct RobotController<T: Transport> {
    transport: T,
    panel: Panel,
    settle: Duration,
}

impl<T: Transport> RobotController<T> {
    pub fn new(transport: T, layout: Layout) -> Self {
        Self {
            transport,
            panel: Panel::new(layout),
            settle: Duration::ZERO,
        }
    }

    /// Pause this long after a query before checking for a reply.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Handle a button press.
    pub fn dispatch(&mut self, cmd: Command) -> Result<(), TransportError> {
        match cmd {
            Command::GetDistance => self.get_distance(),
            Command::GetFace => self.get_face(),
            other => self.send_command(other),
        }
    }

    pub fn send_command(&mut self, cmd: Command) -> Result<(), TransportError> {
        self.transport.write_line(&cmd.line())?;
        info!(command = %cmd, "command sent");
        self.panel.show_command(cmd);
        if self.panel.layout().tracks_mood() {
            self.get_face()?;
        }
        Ok(())
    }

    pub fn get_distance(&mut self) -> Result<(), TransportError> {
        self.transport.write_line(&Command::GetDistance.line())?;
        let Some(distance) = self.read_reply()? else {
            return Ok(());
        };
        info!(%distance, "distance received");
        self.panel.show_distance(&distance);
        if self.panel.layout().tracks_mood() {
            self.get_face()?;
        }
        Ok(())
    }

    pub fn get_face(&mut self) -> Result<(), TransportError> {
        self.transport.write_line(&Command::GetFace.line())?;
        if let Some(reply) = self.read_reply()? {
            match Mood::from_reply(&reply) {
                Some(mood) => {
                    debug!(?mood, "mood received");
                    self.panel.show_mood(mood);
                }
                None => debug!(%reply, "unrecognised mood reply"),
            }
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.panel.reset();
    }

    fn read_reply(&mut self) -> Result<Option<String>, TransportError> {
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
        if self.transport.bytes_available()? == 0 {
            debug!("no reply waiting");
            return Ok(None);
        }
        let raw = self.transport.read_line()?;
        match String::from_utf8(raw) {
            Ok(text) => Ok(Some(text.trim().to_string())),
            Err(e) => {
                debug!(error = %e, "reply is not valid UTF-8");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use tracing_test::traced_test;

    fn controller(layout: Layout) -> (RobotController<MemoryTransport>, MemoryTransport) {
        let wire = MemoryTransport::new();
        (RobotController::new(wire.clone(), layout), wire)
    }

    #[test]
    fn plain_command_writes_only_its_line() {
        let (mut ctl, wire) = controller(Layout::Plain);
        ctl.dispatch(Command::MoveForward).unwrap();
        assert_eq!(wire.written(), b"Move Forward\n");
        assert_eq!(ctl.panel().status(), "Status: Move Forward sent");
    }

    #[test]
    fn bilingual_command_follows_up_with_face_query() {
        let (mut ctl, wire) = controller(Layout::Bilingual);
        wire.push_reply("Sad");
        ctl.dispatch(Command::Stop).unwrap();
        assert_eq!(wire.written(), b"Stop\nGet Face\n");
        assert_eq!(ctl.panel().status(), "Status: Stop / 狀態: Stop");
        assert_eq!(ctl.panel().mood(), Some(Mood::Sad));
    }

    #[test]
    fn nothing_is_read_when_nothing_is_waiting() {
        let (mut ctl, wire) = controller(Layout::Plain);
        ctl.dispatch(Command::GetDistance).unwrap();
        assert_eq!(wire.reads(), 0);
        assert_eq!(ctl.panel().status(), "Status: Ready");
    }

    #[test]
    fn distance_is_shown_verbatim() {
        let (mut ctl, wire) = controller(Layout::Plain);
        wire.push_reply("  -3.7e2 \r");
        ctl.get_distance().unwrap();
        assert_eq!(ctl.panel().status(), "Distance: -3.7e2 cm");
    }

    #[test]
    fn invalid_utf8_reply_is_ignored() {
        let (mut ctl, wire) = controller(Layout::Plain);
        wire.push_reply([0xff, 0xfe]);
        ctl.get_distance().unwrap();
        assert_eq!(wire.reads(), 1);
        assert_eq!(ctl.panel().status(), "Status: Ready");
    }

    #[traced_test]
    #[test]
    fn unknown_mood_leaves_display_unchanged() {
        let (mut ctl, wire) = controller(Layout::Bilingual);
        wire.push_reply("Sad");
        ctl.get_face().unwrap();
        wire.push_reply("Grumpy");
        ctl.get_face().unwrap();
        assert_eq!(ctl.panel().mood(), Some(Mood::Sad));
        assert!(logs_contain("unrecognised mood reply"));
    }

    struct Unplugged;

    impl Transport for Unplugged {
        fn write_line(&mut self, _line: &[u8]) -> Result<(), TransportError> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe).into())
        }

        fn bytes_available(&mut self) -> Result<usize, TransportError> {
            Ok(0)
        }

        fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn write_failure_leaves_panel_alone() {
        let mut ctl = RobotController::new(Unplugged, Layout::Bilingual);
        assert!(ctl.dispatch(Command::MoveForward).is_err());
        assert_eq!(ctl.panel(), &Panel::new(Layout::Bilingual));
    }

    #[test]
    fn reset_restores_initial_panel() {
        let (mut ctl, wire) = controller(Layout::Bilingual);
        wire.push_reply("Sad");
        ctl.dispatch(Command::Reboot).unwrap();
        ctl.reset();
        assert_eq!(ctl.panel(), &Panel::new(Layout::Bilingual));
    }
}
