//! The local HTTP listener side of browser-based login: persists the tokens
//! and user returned by a single `/auth/callback` POST into the key store.
//! Opening a system browser and rendering the login page are the CLI's and
//! the remote's jobs respectively; this module only owns the wait and the
//! resulting key-store writes.

use std::io::Read as _;
use std::io::Write as _;
use std::net::TcpListener;
use std::net::TcpStream;
use std::time::Duration;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;

use crate::error::RemoteError;
use crate::error::Result;
use crate::keystore::ACCESS_TOKEN_KEY;
use crate::keystore::AUTH_RESPONSE_KEY;
use crate::keystore::CURRENT_USER_KEY;
use crate::keystore::Keystore;
use crate::keystore::REFRESH_TOKEN_KEY;

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(30);
const HARD_KILL_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCallback {
    pub access_token: String,
    pub refresh_token: String,
    pub user: serde_json::Value,
}

/// Binds an ephemeral local listener and returns the port the CLI should
/// embed into the authorization URL it opens in the user's browser.
pub struct AuthListener {
    listener: TcpListener,
}

impl AuthListener {
    pub fn bind() -> Result<Self> {
        let listener =
            TcpListener::bind("127.0.0.1:0").map_err(|e| RemoteError::Remote(e.to_string()))?;
        listener
            .set_nonblocking(true)
            .map_err(|e| RemoteError::Remote(e.to_string()))?;
        Ok(Self { listener })
    }

    pub fn port(&self) -> Result<u16> {
        self.listener
            .local_addr()
            .map(|a| a.port())
            .map_err(|e| RemoteError::Remote(e.to_string()).into())
    }

    /// Blocks (polling) until the first `POST /auth/callback` arrives, the
    /// 30-second wait elapses, or the 5-minute hard kill fires.
    pub fn wait_for_callback(&self) -> Result<AuthCallback> {
        let deadline = Instant::now() + CALLBACK_TIMEOUT;
        let hard_deadline = Instant::now() + HARD_KILL_TIMEOUT;
        loop {
            if Instant::now() > hard_deadline.min(deadline) {
                return Err(RemoteError::AuthenticationTimeout.into());
            }
            match self.listener.accept() {
                Ok((stream, _addr)) => {
                    if let Some(callback) = handle_connection(stream) {
                        return Ok(callback);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => return Err(RemoteError::Remote(e.to_string()).into()),
            }
        }
    }
}

fn handle_connection(mut stream: TcpStream) -> Option<AuthCallback> {
    let mut buf = [0u8; 8192];
    let n = stream.read(&mut buf).ok()?;
    let request = String::from_utf8_lossy(&buf[..n]);
    let body = request.split("\r\n\r\n").nth(1)?;
    let callback: AuthCallback = serde_json::from_str(body).ok()?;

    let response = "HTTP/1.1 200 OK\r\nAccess-Control-Allow-Origin: *\r\nContent-Length: 0\r\n\r\n";
    let _ = stream.write_all(response.as_bytes());
    Some(callback)
}

/// Persists the callback's tokens and user into the key store.
pub fn persist_callback(keystore: &impl Keystore, callback: &AuthCallback) -> Result<()> {
    keystore.set_raw(ACCESS_TOKEN_KEY, &callback.access_token).map_err(crate::error::Error::from)?;
    keystore.set_raw(REFRESH_TOKEN_KEY, &callback.refresh_token).map_err(crate::error::Error::from)?;
    keystore.set(CURRENT_USER_KEY, &callback.user).map_err(crate::error::Error::from)?;
    keystore.set(AUTH_RESPONSE_KEY, callback).map_err(crate::error::Error::from)?;
    Ok(())
}

pub const DEFAULT_LOGIN_REDIRECT_URL: &str = "http://127.0.0.1:3000/auth/login";
