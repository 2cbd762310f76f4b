use std::path::{Path, PathBuf};

use super::{CommonArgs, CredentialArgs, connect, read_file, read_files, report};
use crate::config::Config;
use crate::domain::request;
use crate::error::{BwsError, Result};

pub async fn live_detect(
    common: &CommonArgs,
    credentials: &CredentialArgs,
    config: &Config,
    files: &[PathBuf],
    challenge: Option<&str>,
) -> Result<()> {
    let images = read_files(files).await?;
    let request = request::liveness_detection(images, challenge)?;

    let dispatcher = connect(common, Some(credentials), config)?;
    let outcome = dispatcher.liveness_detection(request).await?;
    report(common.verbosity, &outcome)
}

pub async fn video_live_detect(
    common: &CommonArgs,
    credentials: &CredentialArgs,
    config: &Config,
    files: &[PathBuf],
) -> Result<()> {
    let [video] = files else {
        return Err(BwsError::InvalidRequest(format!(
            "exactly one video file is required, got {}",
            files.len()
        )));
    };
    let request = request::video_liveness_detection(read_file(video).await?)?;

    let dispatcher = connect(common, Some(credentials), config)?;
    let outcome = dispatcher.video_liveness_detection(request).await?;
    report(common.verbosity, &outcome)
}

#[derive(Debug, Clone, Copy)]
pub struct PhotoVerifyOptions<'a> {
    pub photo: Option<&'a Path>,
    pub disable_live: bool,
    pub challenge: Option<&'a str>,
}

pub async fn photo_verify(
    common: &CommonArgs,
    credentials: &CredentialArgs,
    config: &Config,
    files: &[PathBuf],
    options: PhotoVerifyOptions<'_>,
) -> Result<()> {
    let images = read_files(files).await?;
    let photo = match options.photo {
        Some(path) => Some(read_file(path).await?),
        None => None,
    };
    let request =
        request::photo_verify(images, photo, options.challenge, options.disable_live)?;

    let dispatcher = connect(common, Some(credentials), config)?;
    let outcome = dispatcher.photo_verify(request).await?;
    report(common.verbosity, &outcome)
}
