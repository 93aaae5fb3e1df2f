use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::payload::ProfilePayload;

/// Trusted verify-and-decode utility. Signature checking is delegated to it
/// entirely; its exit code is authoritative.
pub const SECURITY_TOOL: &str = "/usr/bin/security";

pub const DEFAULT_DECODE_TIMEOUT: Duration = Duration::from_secs(30);

/// Verify-and-decode capability over a signed profile container. Production
/// code goes through `security cms`; tests supply canned payloads.
#[allow(async_fn_in_trait)]
pub trait ProfileDecoder {
    /// Returns the decoded payload, or `None` on any decode or verification
    /// failure. Per-file failures are never fatal to a scan.
    async fn decode(&self, path: &Path) -> Option<ProfilePayload>;
}

/// Decodes profiles by running `security cms -D` against a scratch plist
/// file. The scratch file lives only for the duration of one decode and is
/// removed on every exit path.
pub struct CmsDecoder {
    timeout: Duration,
}

impl CmsDecoder {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_DECODE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for CmsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileDecoder for CmsDecoder {
    async fn decode(&self, path: &Path) -> Option<ProfilePayload> {
        let scratch = match tempfile::Builder::new()
            .prefix("provsel-")
            .suffix(".plist")
            .tempfile()
        {
            Ok(scratch) => scratch,
            Err(err) => {
                log::debug!("failed to create scratch plist: {err}");
                return None;
            }
        };

        let mut child = match Command::new(SECURITY_TOOL)
            .args(["cms", "-D", "-i"])
            .arg(path)
            .arg("-o")
            .arg(scratch.path())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                log::debug!("failed to spawn {SECURITY_TOOL}: {err}");
                return None;
            }
        };

        let status = match timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => {
                log::debug!("decode of {} failed: {err}", path.display());
                return None;
            }
            Err(_) => {
                log::debug!(
                    "decode of {} timed out after {:?}, killing",
                    path.display(),
                    self.timeout
                );
                child.kill().await.ok();
                return None;
            }
        };
        if !status.success() {
            log::debug!("decode of {} exited with {status}", path.display());
            return None;
        }

        match plist::from_file(scratch.path()) {
            Ok(payload) => Some(payload),
            Err(err) => {
                log::debug!("unreadable payload in {}: {err}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Covers both failure shapes: on macOS `security` rejects the bogus
    // container, elsewhere the spawn itself fails. Either way the decode
    // reports absent and the scratch file is gone.
    #[tokio::test]
    async fn failed_decode_is_absent_and_leaves_no_scratch_files() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.mobileprovision");
        std::fs::write(&bogus, b"not a signed container").unwrap();

        let decoder = CmsDecoder::new();
        assert!(decoder.decode(&bogus).await.is_none());

        let leftovers: Vec<_> = std::fs::read_dir(std::env::temp_dir())
            .unwrap()
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("provsel-"))
            .collect();
        assert!(leftovers.is_empty(), "scratch files left behind: {leftovers:?}");
    }
}
