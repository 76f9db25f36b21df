use std::fmt::Debug;

const DEFAULT_ASK_PATH: &str = "/ask";

/// Builder for [`HttpConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpConfigBuilder {
    server_url: String,
    ask_path: Option<String>,
}

impl HttpConfigBuilder {
    /// Creates a builder with the given server URL, e.g.
    /// `https://alexis.example.com`.
    #[inline]
    pub fn with_server_url<S: Into<String>>(server_url: S) -> Self {
        Self {
            server_url: server_url.into(),
            ask_path: None,
        }
    }

    /// Sets a custom path of the ask endpoint. Defaults to `/ask`.
    #[inline]
    pub fn with_ask_path<S: Into<String>>(mut self, ask_path: S) -> Self {
        self.ask_path = Some(ask_path.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> HttpConfig {
        let ask_path = self
            .ask_path
            .unwrap_or_else(|| DEFAULT_ASK_PATH.to_owned());
        let ask_path = ask_path.trim_start_matches('/');
        let server_url = self.server_url.trim_end_matches('/');
        HttpConfig {
            ask_url: format!("{server_url}/{ask_path}"),
        }
    }
}

/// Configuration for the HTTP answer provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpConfig {
    pub(crate) ask_url: String,
}

impl HttpConfig {
    /// Returns the full URL of the ask endpoint.
    #[inline]
    pub fn ask_url(&self) -> &str {
        &self.ask_url
    }
}
