use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("map: {0}")]
    Map(String),

    #[error("asset: {0}")]
    Asset(String),

    #[error("config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("protocol: {0}")]
    Protocol(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
