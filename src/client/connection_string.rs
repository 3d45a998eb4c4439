//! Connection string building
//!
//! Renders a [`ConnectionConfig`] in the go-mysql DSN form for logging:
//! * `user[:password]@tcp(host:port)/database[?params]`
//!
//! and turns it into driver options, resolving the `tls` key against a
//! [`TrustRegistry`].

use crate::config::ConnectionConfig;
use crate::connection::TrustRegistry;
use crate::{Error, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlSslMode};

/// Host used when the address is empty
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Port used when the address has none
pub const DEFAULT_PORT: u16 = 3306;

impl ConnectionConfig {
    /// DSN text with the password redacted
    ///
    /// ```
    /// use mycrud::ConnectionConfig;
    ///
    /// let config = ConnectionConfig {
    ///     password: "secret".into(),
    ///     tls: Some("custom".into()),
    ///     ..ConnectionConfig::default()
    /// };
    /// assert_eq!(
    ///     config.dsn(),
    ///     "root:***@tcp(localhost:3306)/mycrud?loc=UTC&parseTime=true&tls=custom"
    /// );
    /// ```
    pub fn dsn(&self) -> String {
        let mut dsn = self.user.clone();
        if !self.password.is_empty() {
            dsn.push_str(":***");
        }
        dsn.push_str(&format!("@{}({})/{}", self.net, self.addr, self.database));

        let mut params = vec![format!("loc={}", self.timezone)];
        if self.parse_time {
            params.push("parseTime=true".to_string());
        }
        if let Some(ref key) = self.tls {
            params.push(format!("tls={}", key));
        }
        dsn.push('?');
        dsn.push_str(&params.join("&"));
        dsn
    }

    /// Build driver connect options.
    ///
    /// With a trust profile the connection requires TLS, verifies the server
    /// certificate against the profile's roots (hostname included) and presents the
    /// client certificate. Without one, TLS is disabled.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the address is malformed or the `tls` key is not
    /// registered.
    pub fn connect_options(&self, registry: &TrustRegistry) -> Result<MySqlConnectOptions> {
        let (host, port) = split_addr(&self.addr)?;

        let mut options = MySqlConnectOptions::new()
            .host(&host)
            .port(port)
            .username(&self.user)
            .database(&self.database)
            .timezone(Some(self.timezone.offset().to_string()));

        if !self.password.is_empty() {
            options = options.password(&self.password);
        }

        options = match self.tls {
            None => options.ssl_mode(MySqlSslMode::Disabled),
            Some(ref key) => {
                let profile = registry.get(key).ok_or_else(|| {
                    Error::Config(format!("trust profile '{}' is not registered", key))
                })?;
                options
                    .ssl_mode(MySqlSslMode::VerifyIdentity)
                    .ssl_ca_from_pem(profile.ca_pem().to_vec())
                    .ssl_client_cert_from_pem(profile.client_cert_pem())
                    .ssl_client_key_from_pem(profile.client_key_pem())
            }
        };

        Ok(options)
    }
}

/// Split a `host:port` address.
///
/// Accepts `host`, `host:port`, `[v6]` and `[v6]:port`. A missing port means 3306;
/// an empty address or host means the local loopback.
pub fn split_addr(addr: &str) -> Result<(String, u16)> {
    if addr.is_empty() {
        return Ok((DEFAULT_HOST.to_string(), DEFAULT_PORT));
    }

    let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| Error::Config(format!("invalid address '{}': missing ']'", addr)))?;
        let port = match tail {
            "" => None,
            tail => Some(tail.strip_prefix(':').ok_or_else(|| {
                Error::Config(format!("invalid address '{}': expected ':' after ']'", addr))
            })?),
        };
        (host, port)
    } else {
        match addr.rsplit_once(':') {
            Some((host, _)) if host.contains(':') => {
                return Err(Error::Config(format!(
                    "invalid address '{}': IPv6 hosts must be bracketed",
                    addr
                )));
            }
            Some((host, port)) => (host, Some(port)),
            None => (addr, None),
        }
    };

    let port = match port {
        Some(port) => port
            .parse::<u16>()
            .map_err(|_| Error::Config(format!("invalid port in address '{}'", addr)))?,
        None => DEFAULT_PORT,
    };
    let host = if host.is_empty() { DEFAULT_HOST } else { host };

    Ok((host.to_string(), port))
}
