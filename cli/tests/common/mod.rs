//! Shared CLI test harness: a throwaway working directory plus a convenience
//! wrapper for invoking the `cellar` binary against it.

use std::io::Read as _;
use std::io::Write as _;
use std::net::TcpListener;
use std::net::TcpStream;
use std::path::Path;
use std::thread::JoinHandle;

use assert_cmd::Command;

pub struct TestEnvironment {
    dir: tempfile::TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("create temp dir") }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// A `cellar` invocation rooted at this environment's directory.
    pub fn cellar_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cellar").expect("find cellar binary");
        cmd.current_dir(self.dir.path());
        cmd
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// A stub remote that accepts exactly one HTTP request on a loopback port
/// and replies with a canned status line and JSON body, regardless of the
/// request's path or content. Good enough for exercising the client side of
/// push/clone without a real remote server.
pub struct StubServer {
    port: u16,
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    pub fn start(status_line: &'static str, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let port = listener.local_addr().expect("local addr").port();
        let handle = std::thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                respond(stream, status_line, &body);
            }
        });
        Self { port, handle: Some(handle) }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond(mut stream: TcpStream, status_line: &str, body: &str) {
    let mut buf = [0u8; 16384];
    let _ = stream.read(&mut buf);
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
