use std::{
    fmt::Debug,
    hash::Hash,
    io,
    net::SocketAddr,
};

use tokio::{
    net::UdpSocket,
    sync::mpsc,
};

use message::FRAME_SIZE;

/// Outbound half of the transport boundary.
///
/// `transmit` hands exactly one sealed frame to the link, fire-and-forget.
/// A short write is an error, never a silently truncated frame.
#[async_trait::async_trait]
pub trait FrameSender {
    async fn transmit(&self, frame: &[u8; FRAME_SIZE]) -> io::Result<()>;
}

/// Inbound half of the transport boundary.
///
/// Non-blocking by contract: the control loop calls this on every pass and
/// must never stall behind the radio. `Ok(None)` means nothing is pending.
/// Each frame arrives tagged with the transport's notion of who sent it, so
/// replay state can be kept per sender.
pub trait FrameReceiver {
    type Sender: Clone + Eq + Hash + Debug;

    fn receive_if_available(&mut self) -> io::Result<Option<(Self::Sender, [u8; FRAME_SIZE])>>;
}

#[async_trait::async_trait]
impl FrameSender for UdpSocket {
    async fn transmit(&self, frame: &[u8; FRAME_SIZE]) -> io::Result<()> {
        let sent = self.send(frame).await?;

        if sent != FRAME_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "datagram write truncated",
            ));
        }

        Ok(())
    }
}

impl FrameReceiver for UdpSocket {
    type Sender = SocketAddr;

    fn receive_if_available(&mut self) -> io::Result<Option<(SocketAddr, [u8; FRAME_SIZE])>> {
        // Oversized so a foreign jumbo datagram is distinguishable from a
        // frame-sized one instead of being silently truncated to fit.
        let mut buf = [0u8; FRAME_SIZE + 1];

        loop {
            match self.try_recv_from(&mut buf) {
                Ok((len, addr)) if len == FRAME_SIZE => {
                    let mut frame = [0u8; FRAME_SIZE];
                    frame.copy_from_slice(&buf[..FRAME_SIZE]);
                    return Ok(Some((addr, frame)));
                }
                Ok((len, addr)) => {
                    // Wrong-sized datagrams are foreign traffic; keep
                    // draining so they cannot shadow a queued frame.
                    tracing::trace!(%addr, len, "dropping datagram of foreign size");
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait::async_trait]
impl FrameSender for mpsc::Sender<[u8; FRAME_SIZE]> {
    async fn transmit(&self, frame: &[u8; FRAME_SIZE]) -> io::Result<()> {
        self.send(*frame)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::ConnectionAborted, e))
    }
}

impl FrameReceiver for mpsc::Receiver<[u8; FRAME_SIZE]> {
    type Sender = ();

    fn receive_if_available(&mut self) -> io::Result<Option<((), [u8; FRAME_SIZE])>> {
        match self.try_recv() {
            Ok(frame) => Ok(Some(((), frame))),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "remote end of channel closed",
            )),
        }
    }
}
