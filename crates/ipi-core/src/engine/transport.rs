use super::error::EngineError;
use std::fmt;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::path::PathBuf;
use tracing::{debug, info};

/// Directory and prefix i-PI uses for its unix domain sockets.
pub const UNIX_SOCKET_PREFIX: &str = "/tmp/ipi_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Tcp { host: String, port: u16 },
    /// A unix domain socket at `/tmp/ipi_<name>`.
    Unix { name: String },
}

impl Endpoint {
    pub fn unix_socket_path(&self) -> Option<PathBuf> {
        match self {
            Endpoint::Unix { name } => Some(PathBuf::from(format!("{UNIX_SOCKET_PREFIX}{name}"))),
            Endpoint::Tcp { .. } => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp { host, port } => write!(f, "tcp://{}:{}", host, port),
            Endpoint::Unix { name } => write!(f, "unix://{}{}", UNIX_SOCKET_PREFIX, name),
        }
    }
}

/// An open byte stream to the peer.
#[derive(Debug)]
pub enum Connection {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Connection::Tcp(s) => s.read(buf),
            #[cfg(unix)]
            Connection::Unix(s) => s.read(buf),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Connection::Tcp(s) => s.write(buf),
            #[cfg(unix)]
            Connection::Unix(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Connection::Tcp(s) => s.flush(),
            #[cfg(unix)]
            Connection::Unix(s) => s.flush(),
        }
    }
}

/// Opens a blocking connection to `endpoint`.
pub fn connect(endpoint: &Endpoint) -> Result<Connection, EngineError> {
    let wrap = |source: io::Error| EngineError::Connection {
        endpoint: endpoint.to_string(),
        source,
    };

    let connection = match endpoint {
        Endpoint::Tcp { host, port } => {
            let stream = TcpStream::connect((host.as_str(), *port)).map_err(wrap)?;
            // Messages are small and strictly request/response.
            stream.set_nodelay(true).map_err(wrap)?;
            Connection::Tcp(stream)
        }
        Endpoint::Unix { .. } => connect_unix(endpoint).map_err(wrap)?,
    };
    info!("Connected to {}", endpoint);
    Ok(connection)
}

#[cfg(unix)]
fn connect_unix(endpoint: &Endpoint) -> io::Result<Connection> {
    let path = endpoint
        .unix_socket_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "not a unix endpoint"))?;
    debug!("Opening unix domain socket at {:?}", path);
    std::os::unix::net::UnixStream::connect(path).map(Connection::Unix)
}

#[cfg(not(unix))]
fn connect_unix(_endpoint: &Endpoint) -> io::Result<Connection> {
    debug!("Unix domain sockets requested on a non-unix target");
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "unix domain sockets are not available on this platform",
    ))
}
