use std::time::Duration;
use tokio::net::TcpStream;

/// "Is the network available" check run before a load is attempted.
///
/// Opens (and immediately drops) a TCP connection to the API host. A forced
/// offline flag or a base URL without a usable host always reports
/// unavailable.
#[derive(Debug, Clone)]
pub struct ConnectivityCheck {
    endpoint: Option<(String, u16)>,
    forced_offline: bool,
    timeout: Duration,
}

impl ConnectivityCheck {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    pub fn new(endpoint: Option<(String, u16)>, forced_offline: bool) -> Self {
        Self {
            endpoint,
            forced_offline,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn is_available(&self) -> bool {
        if self.forced_offline {
            return false;
        }
        let Some((host, port)) = &self.endpoint else {
            tracing::warn!("No API host to probe, treating network as unavailable");
            return false;
        };

        match tokio::time::timeout(self.timeout, TcpStream::connect((host.as_str(), *port))).await
        {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                tracing::info!(host = %host, port, error = %e, "Connectivity check failed");
                false
            }
            Err(_) => {
                tracing::info!(host = %host, port, "Connectivity check timed out");
                false
            }
        }
    }
}
