//! # Probe Worker
//!
//! One probe is one attempt to authenticate against a single address and,
//! on success, read the remote host's name. Every failure mode is caught
//! here and classified into [`FailureReason`]; nothing escapes a probe as
//! an error. libssh2 performs blocking I/O, so the production prober runs
//! each attempt on the tokio blocking pool.

use std::fmt;
use std::io::{self, Read};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ssh2::{ErrorCode, Session};
use thiserror::Error;
use tracing::trace;

use sweepr_common::network::credential::Credential;

/// Sentinel hostname for a host that authenticated but whose diagnostic
/// command produced nothing.
pub const UNKNOWN_HOSTNAME: &str = "unknown";

/// The single diagnostic command run after a successful login.
const HOSTNAME_COMMAND: &str = "hostname";

// libssh2 codes surfaced when the session timeout expires mid-exchange.
const LIBSSH2_ERROR_TIMEOUT: i32 = -9;
const LIBSSH2_ERROR_SOCKET_TIMEOUT: i32 = -30;

/// A host that accepted the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub addr: Ipv4Addr,
    pub hostname: String,
}

/// Why a probe produced no discovery.
///
/// Never shown to the operator; kept for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The host actively refused or dropped the connection.
    Refused,
    /// Connect, exchange or command exceeded its bound.
    Timeout,
    /// The host speaks SSH but rejected the credential.
    AuthFailed,
    /// No route or the network is down.
    Unreachable,
    /// Any transport error outside the known cases.
    Other,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Refused => "connection refused",
            Self::Timeout => "timeout",
            Self::AuthFailed => "authentication failed",
            Self::Unreachable => "network unreachable",
            Self::Other => "transport error",
        };
        f.write_str(label)
    }
}

/// The classified result of exactly one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success(Discovery),
    Failure {
        addr: Ipv4Addr,
        reason: FailureReason,
    },
}

impl ProbeOutcome {
    pub fn success(addr: Ipv4Addr, hostname: impl Into<String>) -> Self {
        Self::Success(Discovery {
            addr,
            hostname: hostname.into(),
        })
    }

    pub fn failure(addr: Ipv4Addr, reason: FailureReason) -> Self {
        Self::Failure { addr, reason }
    }

    pub fn addr(&self) -> Ipv4Addr {
        match self {
            Self::Success(discovery) => discovery.addr,
            Self::Failure { addr, .. } => *addr,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Errors raised along the attempt, one variant per phase.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("tcp connect failed: {0}")]
    Connect(#[from] io::Error),
    #[error("session setup failed: {0}")]
    Session(ssh2::Error),
    #[error("ssh handshake failed: {0}")]
    Handshake(ssh2::Error),
    #[error("authentication rejected: {0}")]
    Auth(ssh2::Error),
}

impl ProbeError {
    /// Total classification into the failure taxonomy; no error maps to
    /// more than one reason and none is left unclassified.
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::Connect(err) => classify_io_error(err),
            Self::Session(_) => FailureReason::Other,
            Self::Handshake(err) if is_timeout(err) => FailureReason::Timeout,
            Self::Handshake(_) => FailureReason::Other,
            Self::Auth(err) if is_timeout(err) => FailureReason::Timeout,
            Self::Auth(_) => FailureReason::AuthFailed,
        }
    }
}

fn classify_io_error(err: &io::Error) -> FailureReason {
    use io::ErrorKind;

    match err.kind() {
        ErrorKind::ConnectionRefused
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted => FailureReason::Refused,
        ErrorKind::TimedOut | ErrorKind::WouldBlock => FailureReason::Timeout,
        ErrorKind::HostUnreachable
        | ErrorKind::NetworkUnreachable
        | ErrorKind::NetworkDown
        | ErrorKind::AddrNotAvailable => FailureReason::Unreachable,
        _ => FailureReason::Other,
    }
}

fn is_timeout(err: &ssh2::Error) -> bool {
    matches!(
        err.code(),
        ErrorCode::Session(LIBSSH2_ERROR_TIMEOUT | LIBSSH2_ERROR_SOCKET_TIMEOUT)
    )
}

/// The seam between the pool and the transport.
///
/// Implementations must be infallible: whatever goes wrong, the answer is
/// a classified [`ProbeOutcome`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome;
}

/// Production prober: password authentication over ssh2, one attempt per
/// address, connect and command phases bounded independently.
pub struct SshProber {
    credential: Arc<Credential>,
    port: u16,
    connect_timeout: Duration,
    command_timeout: Duration,
}

impl SshProber {
    pub fn new(
        credential: Credential,
        port: u16,
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> Self {
        Self {
            credential: Arc::new(credential),
            port,
            connect_timeout,
            command_timeout,
        }
    }
}

#[async_trait]
impl Prober for SshProber {
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome {
        let credential = Arc::clone(&self.credential);
        let port = self.port;
        let connect_timeout = self.connect_timeout;
        let command_timeout = self.command_timeout;

        let attempt = tokio::task::spawn_blocking(move || {
            authenticate_and_identify(addr, port, &credential, connect_timeout, command_timeout)
        })
        .await;

        match attempt {
            Ok(Ok(hostname)) => ProbeOutcome::success(addr, hostname),
            Ok(Err(err)) => {
                let reason = err.reason();
                trace!("probe {addr} discarded ({reason}): {err}");
                ProbeOutcome::failure(addr, reason)
            }
            Err(join_err) => {
                trace!("probe task for {addr} aborted: {join_err}");
                ProbeOutcome::failure(addr, FailureReason::Other)
            }
        }
    }
}

/// The blocking attempt: connect, handshake, authenticate, identify.
///
/// The session owns the TCP stream, so every exit path drops the
/// connection with the attempt; the success path also sends a best-effort
/// disconnect first.
fn authenticate_and_identify(
    addr: Ipv4Addr,
    port: u16,
    credential: &Credential,
    connect_timeout: Duration,
    command_timeout: Duration,
) -> Result<String, ProbeError> {
    let socket_addr = SocketAddr::from((addr, port));
    let stream = TcpStream::connect_timeout(&socket_addr, connect_timeout)?;
    let _ = stream.set_read_timeout(Some(connect_timeout));
    let _ = stream.set_write_timeout(Some(connect_timeout));

    let mut session = Session::new().map_err(ProbeError::Session)?;
    session.set_timeout(connect_timeout.as_millis() as u32);
    session.set_tcp_stream(stream);
    session.handshake().map_err(ProbeError::Handshake)?;

    session
        .userauth_password(&credential.username, &credential.password)
        .map_err(ProbeError::Auth)?;

    // A login we cannot name is still a discovery.
    let hostname =
        read_remote_hostname(&session, command_timeout).unwrap_or_else(|| UNKNOWN_HOSTNAME.into());

    let _ = session.disconnect(None, "sweep complete", None);
    Ok(hostname)
}

fn read_remote_hostname(session: &Session, command_timeout: Duration) -> Option<String> {
    session.set_timeout(command_timeout.as_millis() as u32);

    let mut channel = session.channel_session().ok()?;
    channel.exec(HOSTNAME_COMMAND).ok()?;

    let mut output = String::new();
    channel.read_to_string(&mut output).ok()?;
    let _ = channel.wait_close();

    let hostname = output.trim();
    (!hostname.is_empty()).then(|| hostname.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
