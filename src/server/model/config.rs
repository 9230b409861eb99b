use std::net::SocketAddrV4;
use std::time::Duration;

/// Server configs
#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub addr: SocketAddrV4,
    pub remote: RemoteConfig,
    /// session a new form submits into when the caller does not name one
    pub default_session_id: Option<String>,
    /// forms untouched for longer than this are swept
    pub form_idle: Duration,
}

impl ServerConfig {
    pub fn new(
        addr: SocketAddrV4,
        remote: RemoteConfig,
        default_session_id: Option<String>,
        form_idle: Duration,
    ) -> Self {
        Self {
            addr,
            remote,
            default_session_id,
            form_idle,
        }
    }
}

/// Hosted backend connection settings
#[derive(Clone)]
pub(crate) struct RemoteConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("api_key_set", &!self.api_key.is_empty())
            .field("timeout", &self.timeout)
            .finish()
    }
}
