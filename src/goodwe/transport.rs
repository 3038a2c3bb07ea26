use crate::prelude::*;

use crate::goodwe::command::ProtocolCommand;

use {async_trait::async_trait, std::time::Duration, tokio::net::UdpSocket};

// Largest datagram an inverter sends is well under this.
const RECV_BUFFER_LEN: usize = 1024;

/// Sends one request frame and hands back the reply.
///
/// Datagrams the command's validator rejects are not replies; a transport
/// keeps waiting past them until its deadline. The session checks the reply
/// again before decoding it.
#[async_trait]
pub trait Transport: Send {
    async fn exchange(&mut self, command: &ProtocolCommand) -> Result<Vec<u8>>;
}

// UdpTransport {{{
pub struct UdpTransport {
    socket: UdpSocket,
    peer: String,
    timeout: Duration,
    retries: u32,
}

impl UdpTransport {
    pub async fn connect(host: &str, port: u16, timeout: Duration, retries: u32) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect((host, port)).await?;

        let peer = format!("{}:{}", host, port);
        debug!("udp socket {} connected to {}", socket.local_addr()?, peer);

        Ok(Self {
            socket,
            peer,
            timeout,
            retries,
        })
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// One send, then reads until a datagram passes `command`'s validator or
    /// the timeout runs out. Late replies to earlier requests are skipped.
    async fn attempt(&self, command: &ProtocolCommand) -> Result<Option<Vec<u8>>> {
        self.socket.send(command.request()).await?;

        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut buf = [0u8; RECV_BUFFER_LEN];
        loop {
            match tokio::time::timeout_at(deadline, self.socket.recv(&mut buf)).await {
                Ok(Ok(n)) => {
                    let datagram = &buf[..n];
                    if command.validator(datagram) {
                        return Ok(Some(datagram.to_vec()));
                    }
                    debug!("{}: skipping unexpected datagram {}", self.peer, Utils::hex(datagram));
                }
                Ok(Err(e)) => return Err(Error::Unreachable(e)),
                Err(_) => return Ok(None),
            }
        }
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn exchange(&mut self, command: &ProtocolCommand) -> Result<Vec<u8>> {
        let attempts = self.retries + 1;

        for attempt in 1..=attempts {
            trace!("{}: TX {}", self.peer, command);

            if let Some(response) = self.attempt(command).await? {
                trace!("{}: RX {}", self.peer, Utils::hex(&response));
                return Ok(response);
            }

            if attempt < attempts {
                warn!(
                    "{}: no reply to {} within {}ms, retrying ({}/{})",
                    self.peer,
                    command,
                    self.timeout.as_millis(),
                    attempt,
                    self.retries
                );
            }
        }

        Err(Error::Timeout { attempts })
    }
}
// }}}
