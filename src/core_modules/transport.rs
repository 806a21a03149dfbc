// THEORY:
// The `transport` module is the last stage of the pipeline: a bound UDP
// socket aimed at one fixed destination. One encoded bundle goes out as one
// datagram, once per frame.
//
// Key architectural principles:
// 1.  **Fire and Forget**: no retry, no acknowledgment, no cross-frame
//     buffering. This is a real-time telemetry feed; a stale bundle is
//     worse than a missing one, so a failed send is logged and the frame
//     is dropped.
// 2.  **Fail Softly**: `send` reports success as a plain bool so the
//     pipeline can account for the drop in its frame report without an
//     error ever escaping the frame pass.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// A connectionless sender delivering one frame's bundle per datagram to a
/// fixed destination.
pub struct BlobTransport {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl BlobTransport {
    /// Binds an ephemeral local socket and resolves the destination once.
    /// Resolution or bind failures surface here, at startup, never during a
    /// frame pass.
    pub fn new(destination: &str) -> io::Result<Self> {
        let destination = destination
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("destination resolved to no address: {destination}"),
                )
            })?;
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(Self {
            socket,
            destination,
        })
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Best-effort send of one encoded bundle. Returns false on failure,
    /// after logging it; the caller drops the frame and moves on.
    pub fn send(&self, datagram: &[u8]) -> bool {
        match self.socket.send_to(datagram, self.destination) {
            Ok(_) => true,
            Err(err) => {
                log::warn!(
                    "dropping frame bundle ({} bytes) to {}: {err}",
                    datagram.len(),
                    self.destination
                );
                false
            }
        }
    }
}
