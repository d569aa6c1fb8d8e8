//! Downloading gazetteer files, with an optional on-disk cache of saved inputs.

use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tracing::{debug, info};

use pcodes_config::DownloadSettings;

use crate::error::{IngestError, Result};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Fetches a remote file and returns its local path.
pub trait Retriever {
    fn download(&self, url: &str) -> Result<PathBuf>;
}

/// Local file name for `url`: its last path segment, or a hash of the URL when
/// the segment is not a plain file name or a query string could vary the content.
pub fn file_name_for(url: &str) -> String {
    let path = url.split('#').next().unwrap_or_default();
    let candidate = path.rsplit('/').next().unwrap_or_default();
    let is_usable = !path.contains('?')
        && candidate.contains('.')
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if is_usable {
        candidate.to_string()
    } else {
        hex::encode(Sha256::digest(url.as_bytes()))
    }
}

/// Blocking token-bucket throttle for outbound calls.
pub struct Throttle {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
}

impl Throttle {
    pub fn new(calls: u32, period_ms: u64) -> Result<Self> {
        let invalid = || IngestError::RateLimit { calls, period_ms };
        let burst = NonZeroU32::new(calls).ok_or_else(invalid)?;
        let replenish = Duration::from_millis(period_ms) / calls;
        let quota = Quota::with_period(replenish)
            .ok_or_else(invalid)?
            .allow_burst(burst);
        Ok(Self {
            limiter: RateLimiter::direct(quota),
            clock: DefaultClock::default(),
        })
    }

    /// Block until a call is permitted.
    pub fn wait(&self) {
        while let Err(not_until) = self.limiter.check() {
            std::thread::sleep(not_until.wait_time_from(self.clock.now()));
        }
    }
}

/// HTTP retriever that can save downloads for later offline runs.
pub struct HttpRetriever {
    client: Client,
    user_agent: String,
    throttle: Throttle,
    saved_dir: PathBuf,
    temp_dir: TempDir,
    save: bool,
    use_saved: bool,
}

impl HttpRetriever {
    pub fn new(settings: &DownloadSettings, saved_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = Client::builder().timeout(DOWNLOAD_TIMEOUT).build()?;
        let temp_dir = tempfile::Builder::new()
            .prefix("pcodes-")
            .tempdir()
            .map_err(|e| IngestError::io(std::env::temp_dir(), e))?;
        Ok(Self {
            client,
            user_agent: settings.user_agent.clone(),
            throttle: Throttle::new(settings.calls, settings.period_ms)?,
            saved_dir: saved_dir.into(),
            temp_dir,
            save: false,
            use_saved: false,
        })
    }

    /// Keep downloads in the saved-data directory.
    #[must_use]
    pub fn with_save(mut self, save: bool) -> Self {
        self.save = save;
        self
    }

    /// Serve files from the saved-data directory instead of the network.
    #[must_use]
    pub fn with_use_saved(mut self, use_saved: bool) -> Self {
        self.use_saved = use_saved;
        self
    }

    pub fn saved_dir(&self) -> &Path {
        &self.saved_dir
    }

    fn fetch(&self, url: &str, target: &Path) -> Result<()> {
        self.throttle.wait();
        debug!(%url, target = %target.display(), "downloading");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()?;
        if !response.status().is_success() {
            return Err(IngestError::Http {
                url: url.to_string(),
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }
        let bytes = response.bytes()?;
        fs::write(target, &bytes).map_err(|e| IngestError::io(target, e))?;
        info!(%url, bytes = bytes.len(), "downloaded");
        Ok(())
    }
}

impl Retriever for HttpRetriever {
    fn download(&self, url: &str) -> Result<PathBuf> {
        let file_name = file_name_for(url);
        if self.use_saved {
            let path = self.saved_dir.join(&file_name);
            if path.is_file() {
                debug!(path = %path.display(), "using saved file");
                return Ok(path);
            }
            return Err(IngestError::NotSaved { path });
        }
        let dir = if self.save {
            fs::create_dir_all(&self.saved_dir).map_err(|e| IngestError::io(&self.saved_dir, e))?;
            self.saved_dir.clone()
        } else {
            self.temp_dir.path().to_path_buf()
        };
        let target = dir.join(file_name);
        self.fetch(url, &target)?;
        Ok(target)
    }
}
