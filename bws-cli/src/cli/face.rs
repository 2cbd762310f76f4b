use std::path::PathBuf;

use super::{CommonArgs, CredentialArgs, connect, read_files, report};
use crate::config::Config;
use crate::domain::request;
use crate::error::Result;

pub async fn enroll(
    common: &CommonArgs,
    credentials: &CredentialArgs,
    config: &Config,
    class_id: i64,
    files: &[PathBuf],
) -> Result<()> {
    let request = request::enroll(class_id, read_files(files).await?)?;

    let dispatcher = connect(common, Some(credentials), config)?;
    let outcome = dispatcher.enroll(request).await?;
    report(common.verbosity, &outcome)
}

pub async fn verify(
    common: &CommonArgs,
    credentials: &CredentialArgs,
    config: &Config,
    class_id: i64,
    files: &[PathBuf],
) -> Result<()> {
    let request = request::verify(class_id, read_files(files).await?)?;

    let dispatcher = connect(common, Some(credentials), config)?;
    let outcome = dispatcher.verify(request).await?;
    report(common.verbosity, &outcome)
}

pub async fn search(
    common: &CommonArgs,
    credentials: &CredentialArgs,
    config: &Config,
    files: &[PathBuf],
    tags: Vec<String>,
) -> Result<()> {
    let request = request::search(read_files(files).await?, tags)?;

    let dispatcher = connect(common, Some(credentials), config)?;
    let outcome = dispatcher.search(request).await?;
    report(common.verbosity, &outcome)
}

pub async fn set_tags(
    common: &CommonArgs,
    credentials: &CredentialArgs,
    config: &Config,
    class_id: i64,
    tags: Vec<String>,
) -> Result<()> {
    let request = request::set_template_tags(class_id, tags)?;

    let dispatcher = connect(common, Some(credentials), config)?;
    let outcome = dispatcher.set_template_tags(request).await?;
    report(common.verbosity, &outcome)
}

pub async fn get_template(
    common: &CommonArgs,
    credentials: &CredentialArgs,
    config: &Config,
    class_id: i64,
    thumbnails: bool,
) -> Result<()> {
    let request = request::template_status(class_id, thumbnails)?;

    let dispatcher = connect(common, Some(credentials), config)?;
    let outcome = dispatcher.get_template_status(request).await?;
    report(common.verbosity, &outcome)
}

pub async fn class_count(
    common: &CommonArgs,
    credentials: &CredentialArgs,
    config: &Config,
    tags: Vec<String>,
) -> Result<()> {
    let request = request::class_count(tags);

    let dispatcher = connect(common, Some(credentials), config)?;
    let outcome = dispatcher.get_class_count(request).await?;
    report(common.verbosity, &outcome)
}

pub async fn delete_template(
    common: &CommonArgs,
    credentials: &CredentialArgs,
    config: &Config,
    class_id: i64,
) -> Result<()> {
    let request = request::delete_template(class_id)?;

    let dispatcher = connect(common, Some(credentials), config)?;
    let outcome = dispatcher.delete_template(request).await?;
    report(common.verbosity, &outcome)
}
