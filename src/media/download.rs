use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use thiserror::Error;
use tracing::{info, warn};

use crate::content::TopicId;
use crate::preferences::Language;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DownloadError {
    #[error("downloads are disabled in this build")]
    Disabled,
    #[error("server responded with status {0}")]
    Status(u16),
    #[cfg(feature = "network")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug)]
pub struct DownloadRequest {
    pub url: String,
    pub topic: TopicId,
    pub language: Language,
}

impl DownloadRequest {
    pub fn file_name(&self) -> String {
        format!("{}-{}.pdf", self.topic, self.language.code())
    }
}

type DownloadResult = Result<PathBuf, DownloadError>;

/// Runs one PDF download at a time on a worker thread. The UI polls for the
/// result on each tick.
pub struct PdfDownloader {
    dir: PathBuf,
    rx: Option<mpsc::Receiver<DownloadResult>>,
}

impl PdfDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            rx: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.rx.is_some()
    }

    /// Start a download. Returns false if one is already running.
    pub fn start(&mut self, request: DownloadRequest) -> bool {
        if self.is_busy() {
            return false;
        }
        let (tx, rx) = mpsc::channel();
        let dest = self.dir.join(request.file_name());
        info!(url = %request.url, dest = %dest.display(), "pdf download started");
        thread::spawn(move || {
            let result = fetch_to(&request.url, &dest);
            let _ = tx.send(result);
        });
        self.rx = Some(rx);
        true
    }

    /// Collect a finished download, if any.
    pub fn poll(&mut self) -> Option<DownloadResult> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.rx = None;
                match &result {
                    Ok(path) => info!(path = %path.display(), "pdf download finished"),
                    Err(err) => warn!(error = %err, "pdf download failed"),
                }
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("pdf download worker exited without a result");
                self.rx = None;
                None
            }
        }
    }
}

/// Fetch `url` into `dest`. `file://` sources are copied, which keeps local
/// mirrors working without the network feature.
pub fn fetch_to(url: &str, dest: &Path) -> DownloadResult {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = dest.with_extension("part");
    if let Some(local) = url.strip_prefix("file://") {
        fs::copy(local, &tmp)?;
    } else {
        let bytes = fetch_bytes(url)?;
        fs::write(&tmp, bytes)?;
    }
    fs::rename(&tmp, dest)?;
    Ok(dest.to_path_buf())
}

#[cfg(feature = "network")]
fn fetch_bytes(url: &str) -> Result<Vec<u8>, DownloadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status(status.as_u16()));
    }
    Ok(response.bytes()?.to_vec())
}

#[cfg(not(feature = "network"))]
fn fetch_bytes(_url: &str) -> Result<Vec<u8>, DownloadError> {
    Err(DownloadError::Disabled)
}
