//! Free-port discovery in the ephemeral TCP range
//!
//! This is a probe, not a reservation: a port observed as closed may be
//! taken by another process before the browser binds it. That race is
//! accepted; a later bind failure surfaces to the caller instead of being
//! retried here.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream};
use std::time::Duration;

use crate::error::LaunchError;
use crate::Result;

/// The conventional dynamic/private port range.
pub const EPHEMERAL_RANGE: (u16, u16) = (49152, 65535);

const PROBE_TIMEOUT: Duration = Duration::from_millis(50);

/// Scan `start..=end` ascending and return the first port with no listener.
///
/// A refused loopback connect means nothing is bound there; a successful
/// connect means the port is taken and the scan moves on.
pub fn find_free_port(start: u16, end: u16) -> Result<u16> {
    for port in start..=end {
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port));
        match TcpStream::connect_timeout(&addr, PROBE_TIMEOUT) {
            Ok(_) => continue,
            Err(_) => {
                tracing::debug!(port, "Found free debugging port");
                return Ok(port);
            }
        }
    }

    Err(LaunchError::NoFreePort { start, end })
}

/// [`find_free_port`] over the full ephemeral range.
pub fn find_free_port_default() -> Result<u16> {
    find_free_port(EPHEMERAL_RANGE.0, EPHEMERAL_RANGE.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_returns_port_with_no_listener() {
        // Bind-then-drop gives us a port known to be free a moment ago.
        let probe = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let found = find_free_port(port, port).unwrap();
        assert_eq!(found, port);
    }

    #[test]
    fn test_skips_occupied_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let taken = listener.local_addr().unwrap().port();

        // Scanning from the occupied port must move past it.
        let found = find_free_port(taken, EPHEMERAL_RANGE.1.max(taken)).unwrap();
        assert_ne!(found, taken);
        assert!(found > taken);
    }

    #[test]
    fn test_exhausted_range_reports_bounds() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let taken = listener.local_addr().unwrap().port();

        match find_free_port(taken, taken) {
            Err(LaunchError::NoFreePort { start, end }) => {
                assert_eq!(start, taken);
                assert_eq!(end, taken);
            }
            other => panic!("expected NoFreePort, got {other:?}"),
        }
    }
}
