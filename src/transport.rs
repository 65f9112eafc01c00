use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error(transparent)]
    Serial(#[from] serialport::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A line-oriented byte pipe to the rover.
pub trait Transport: Send {
    /// Write one complete line, terminator included.
    fn write_line(&mut self, line: &[u8]) -> Result<(), TransportError>;

    /// Number of bytes waiting to be read right now. Never blocks.
    fn bytes_available(&mut self) -> Result<usize, TransportError>;

    /// Read up to and excluding the next `\n`. Blocks until the line ends
    /// or the transport's read timeout elapses, in which case whatever
    /// arrived so far is returned.
    fn read_line(&mut self) -> Result<Vec<u8>, TransportError>;
}

/// A USB serial link, 8N1 with no flow control.
pub struct SerialTransport {
    name: String,
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    pub fn open(name: &str, baud: u32, timeout: Duration) -> Result<Self, TransportError> {
        let port = serialport::new(name, baud)
            .timeout(timeout)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|source| TransportError::Open {
                port: name.to_string(),
                source,
            })?;
        info!(port = name, baud, "serial port opened");
        Ok(Self {
            name: name.to_string(),
            port,
        })
    }
}

impl Transport for SerialTransport {
    fn write_line(&mut self, line: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(line)?;
        self.port.flush()?;
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => break,
                Ok(_) => line.push(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    debug!(port = %self.name, partial = line.len(), "read timed out");
                    break;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(line)
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        info!(port = %self.name, "serial port closed");
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    written: Vec<u8>,
    replies: VecDeque<Vec<u8>>,
    reads: usize,
}

/// In-memory transport used for testing. Records everything written and
/// serves scripted replies in order.
///
/// Clones share state, so a test can keep one handle while another is
/// owned by a controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a reply line; the `\n` terminator is appended.
    pub fn push_reply(&self, reply: impl AsRef<[u8]>) {
        let mut line = reply.as_ref().to_vec();
        line.push(b'\n');
        self.state().replies.push_back(line);
    }

    /// Every byte written so far.
    pub fn written(&self) -> Vec<u8> {
        self.state().written.clone()
    }

    /// Written bytes split into lines, terminators removed.
    pub fn written_lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.written())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// How many times `read_line` has been called.
    pub fn reads(&self) -> usize {
        self.state().reads
    }

    /// Number of live clones sharing this transport's state.
    pub fn handles(&self) -> usize {
        Arc::strong_count(&self.state)
    }
}

impl Transport for MemoryTransport {
    fn write_line(&mut self, line: &[u8]) -> Result<(), TransportError> {
        self.state().written.extend_from_slice(line);
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        Ok(self.state().replies.iter().map(Vec::len).sum())
    }

    fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut state = self.state();
        state.reads += 1;
        let mut line = state.replies.pop_front().unwrap_or_default();
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_transport_serves_replies_in_order() {
        let mut transport = MemoryTransport::new();
        transport.push_reply("42");
        transport.push_reply("Happy");
        assert_eq!(transport.bytes_available().unwrap(), 9);
        assert_eq!(transport.read_line().unwrap(), b"42");
        assert_eq!(transport.read_line().unwrap(), b"Happy");
        assert_eq!(transport.bytes_available().unwrap(), 0);
        assert_eq!(transport.reads(), 2);
    }

    #[test]
    fn clones_share_written_bytes() {
        let wire = MemoryTransport::new();
        let mut owned = wire.clone();
        owned.write_line(b"Stop\n").unwrap();
        assert_eq!(wire.written(), b"Stop\n");
        assert_eq!(wire.written_lines(), vec!["Stop".to_string()]);
    }

    #[test]
    fn opening_a_missing_port_names_it() {
        let err = SerialTransport::open("/dev/rover-does-not-exist", 9600, Duration::from_millis(10))
            .err()
            .unwrap();
        assert!(err.to_string().contains("/dev/rover-does-not-exist"));
    }
}
