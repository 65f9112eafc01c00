use std::fmt;
use std::str::FromStr;

use crate::panel::Layout;

/// A command understood by the rover firmware.
///
/// Each command travels as its ASCII text followed by a single `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Stop,
    Reboot,
    GetDistance,
    GetFace,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::MoveForward,
        Command::MoveBackward,
        Command::MoveLeft,
        Command::MoveRight,
        Command::Stop,
        Command::Reboot,
        Command::GetDistance,
        Command::GetFace,
    ];

    /// Text sent on the wire, without the terminator.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::MoveForward => "Move Forward",
            Command::MoveBackward => "Move Backward",
            Command::MoveLeft => "Move Left",
            Command::MoveRight => "Move Right",
            Command::Stop => "Stop",
            Command::Reboot => "Reboot",
            Command::GetDistance => "Get Distance",
            Command::GetFace => "Get Face",
        }
    }

    /// Exact bytes written to the transport.
    pub fn line(self) -> Vec<u8> {
        let mut line = Vec::with_capacity(self.as_str().len() + 1);
        line.extend_from_slice(self.as_str().as_bytes());
        line.push(b'\n');
        line
    }

    /// Button caption for the given layout.
    pub fn label(self, layout: Layout) -> &'static str {
        match layout {
            Layout::Plain => self.as_str(),
            Layout::Bilingual => match self {
                Command::MoveForward => "前進 / Move Forward",
                Command::MoveBackward => "後退 / Move Backward",
                Command::MoveLeft => "左 / Left",
                Command::MoveRight => "右 / Right",
                Command::Stop => "停止 / Stop",
                Command::Reboot => "Reboot",
                Command::GetDistance => "距離 / Distance",
                Command::GetFace => "表情 / Face",
            },
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command {0:?}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}
