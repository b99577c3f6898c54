//! Test-only helpers: entry builders, scripted fetch/HTTP backends and a
//! throwaway local git repository.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::core::spec::{Entry, RemoteType};
use crate::error::VdmError;
use crate::fetch::Fetcher;
use crate::io::http::{HttpClient, HttpResponse};

/// Git entry with an explicit version.
pub fn git_entry(source: &str, version: &str, destination: impl Into<PathBuf>) -> Entry {
    Entry {
        kind: RemoteType::Git,
        source: source.to_string(),
        version: version.to_string(),
        destination: destination.into(),
    }
}

/// File entry without a version.
pub fn file_entry(source: &str, destination: impl Into<PathBuf>) -> Entry {
    Entry {
        kind: RemoteType::File,
        source: source.to_string(),
        version: String::new(),
        destination: destination.into(),
    }
}

/// Fetcher that records every entry it is asked to apply.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    calls: RefCell<Vec<Entry>>,
    fail_on: Option<String>,
    expect_absent: bool,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail (after recording the call) when asked to fetch `source`.
    pub fn fail_on(mut self, source: &str) -> Self {
        self.fail_on = Some(source.to_string());
        self
    }

    /// Panic if the destination still exists when the fetch starts.
    pub fn assert_destination_absent(mut self) -> Self {
        self.expect_absent = true;
        self
    }

    pub fn calls(&self) -> Vec<Entry> {
        self.calls.borrow().clone()
    }
}

impl Fetcher for ScriptedFetcher {
    fn apply(&self, entry: &Entry) -> Result<(), VdmError> {
        self.calls.borrow_mut().push(entry.clone());
        if self.expect_absent {
            assert!(
                !entry.destination.exists(),
                "destination {} should have been cleared",
                entry.destination.display()
            );
        }
        if self.fail_on.as_deref() == Some(entry.source.as_str()) {
            return Err(VdmError::Fetch {
                op: entry.op_msg(),
                action: "scripted fetch".to_string(),
                output: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Canned reply for [`ScriptedHttp`].
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    status: u16,
    body: Vec<u8>,
    broken: bool,
}

impl ScriptedResponse {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            broken: false,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            broken: false,
        }
    }

    /// 200 response whose body errors after yielding `body`.
    pub fn broken(body: Vec<u8>) -> Self {
        Self {
            broken: true,
            ..Self::ok(body)
        }
    }
}

struct BrokenPipe;

impl Read for BrokenPipe {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
    }
}

/// HTTP client that replays responses in order and records requested URLs.
#[derive(Debug, Default)]
pub struct ScriptedHttp {
    responses: RefCell<VecDeque<ScriptedResponse>>,
    requests: RefCell<Vec<String>>,
}

impl ScriptedHttp {
    pub fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl HttpClient for ScriptedHttp {
    fn get(&self, url: &str) -> Result<HttpResponse, VdmError> {
        self.requests.borrow_mut().push(url.to_string());
        let response = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {url}"));
        let body: Box<dyn Read> = if response.broken {
            Box::new(Cursor::new(response.body).chain(BrokenPipe))
        } else {
            Box::new(Cursor::new(response.body))
        };
        Ok(HttpResponse {
            status: response.status,
            body,
        })
    }
}

/// True if a `git` executable can be run.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Local repository with two commits: `v1` is tagged on the first
/// (`VERSION` = "1"), the branch head holds `VERSION` = "2".
pub struct GitFixture {
    dir: TempDir,
}

impl GitFixture {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let fixture = Self { dir };
        fixture.git(&["init", "-q"])?;
        fixture.commit("1")?;
        fixture.git(&["tag", "v1"])?;
        fixture.commit("2")?;
        Ok(fixture)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `file://` URL suitable for `git clone`, including shallow clones.
    pub fn source_url(&self) -> String {
        format!("file://{}", self.path().display())
    }

    fn commit(&self, version: &str) -> io::Result<()> {
        std::fs::write(self.path().join("VERSION"), version)?;
        self.git(&["add", "VERSION"])?;
        self.git(&["commit", "-q", "-m", &format!("version {version}")])
    }

    fn git(&self, args: &[&str]) -> io::Result<()> {
        let output = Command::new("git")
            .arg("-C")
            .arg(self.path())
            .args([
                "-c",
                "user.name=vdm tests",
                "-c",
                "user.email=vdm@example.test",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "tag.gpgsign=false",
            ])
            .args(args)
            .output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            )))
        }
    }
}
