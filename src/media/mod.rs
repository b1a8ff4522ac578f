pub mod download;
pub mod opener;

pub use download::{DownloadError, DownloadRequest, PdfDownloader};
pub use opener::{LinkOpener, SystemOpener};
