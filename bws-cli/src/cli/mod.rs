use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::adapters::ClientFactory;
use crate::auth::{BearerSource, TokenIssuer};
use crate::config::Config;
use crate::domain::{ConnectionContext, Credentials, Deadline, Transport, Verbosity};
use crate::error::{BwsError, Result};
use crate::ports::{BwsTransport, CallOutcome};
use crate::report::{Render, Reporter};
use crate::services::OperationDispatcher;

mod face;
mod health;
mod liveness;

#[derive(Parser, Debug)]
#[command(name = "bws")]
#[command(about = "Client for the biometric web service (liveness, photo verification, face recognition)")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags every subcommand accepts.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Service endpoint URI (http or https)")]
    pub host: String,

    #[arg(short = 'r', long, help = "Use the JSON/HTTP API instead of gRPC")]
    pub rest: bool,

    #[arg(
        short = 'd',
        long,
        allow_negative_numbers = true,
        help = "Call deadline in milliseconds; zero or negative means none"
    )]
    pub deadline: Option<i64>,

    #[arg(
        short = 'v',
        long,
        value_enum,
        default_value_t = Verbosity::Normal,
        help = "Output detail"
    )]
    pub verbosity: Verbosity,

    #[arg(long, help = "Configuration file to use instead of the global one")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
    #[arg(long = "clientid", help = "Client id the token is issued for")]
    pub client_id: String,

    #[arg(long, help = "Base64-encoded signing key")]
    pub key: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "healthcheck", about = "Probe service liveness and readiness")]
    HealthCheck {
        #[command(flatten)]
        common: CommonArgs,
    },

    #[command(name = "livedetect", about = "Passive or challenge-response liveness detection")]
    LiveDetect {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        credentials: CredentialArgs,

        #[arg(help = "One or two live images")]
        files: Vec<PathBuf>,

        #[arg(long, help = "Challenge tag attached to the second image (e.g. up, down)")]
        challenge: Option<String>,
    },

    #[command(name = "videolivedetect", about = "Liveness detection on a video")]
    VideoLiveDetect {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        credentials: CredentialArgs,

        #[arg(help = "Video file")]
        files: Vec<PathBuf>,
    },

    #[command(name = "photoverify", about = "Verify live images against an ID photo")]
    PhotoVerify {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        credentials: CredentialArgs,

        #[arg(help = "One or two live images")]
        files: Vec<PathBuf>,

        #[arg(long, help = "Reference photo")]
        photo: Option<PathBuf>,

        #[arg(long = "disablelive", help = "Skip liveness detection")]
        disable_live: bool,

        #[arg(long, help = "Challenge tag attached to the second image")]
        challenge: Option<String>,
    },

    #[command(name = "enroll", about = "Enroll face images into a class")]
    Enroll {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        credentials: CredentialArgs,

        #[arg(short = 'i', long = "classid", allow_negative_numbers = true)]
        class_id: i64,

        #[arg(help = "Face images")]
        files: Vec<PathBuf>,
    },

    #[command(name = "verify", about = "Verify one face image against a class")]
    Verify {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        credentials: CredentialArgs,

        #[arg(short = 'i', long = "classid", allow_negative_numbers = true)]
        class_id: i64,

        #[arg(help = "Face image")]
        files: Vec<PathBuf>,
    },

    #[command(name = "search", about = "Search enrolled classes for matching faces")]
    Search {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        credentials: CredentialArgs,

        #[arg(help = "Face images")]
        files: Vec<PathBuf>,

        #[arg(long, num_args = 0.., help = "Restrict the search to templates with these tags")]
        tags: Vec<String>,
    },

    #[command(name = "settags", about = "Replace the tags of a template")]
    SetTags {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        credentials: CredentialArgs,

        #[arg(short = 'i', long = "classid", allow_negative_numbers = true)]
        class_id: i64,

        #[arg(long, num_args = 0..)]
        tags: Vec<String>,
    },

    #[command(name = "gettemplate", about = "Show the status of a template")]
    GetTemplate {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        credentials: CredentialArgs,

        #[arg(short = 'i', long = "classid", allow_negative_numbers = true)]
        class_id: i64,

        #[arg(long, help = "Include stored thumbnails")]
        thumbnails: bool,
    },

    #[command(name = "classcount", about = "Count enrolled classes")]
    ClassCount {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        credentials: CredentialArgs,

        #[arg(long, num_args = 0.., help = "Only count templates with these tags")]
        tags: Vec<String>,
    },

    #[command(name = "deletetemplate", about = "Delete a template")]
    DeleteTemplate {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        credentials: CredentialArgs,

        #[arg(short = 'i', long = "classid", allow_negative_numbers = true)]
        class_id: i64,
    },
}

impl Commands {
    pub const fn common(&self) -> &CommonArgs {
        match self {
            Self::HealthCheck { common }
            | Self::LiveDetect { common, .. }
            | Self::VideoLiveDetect { common, .. }
            | Self::PhotoVerify { common, .. }
            | Self::Enroll { common, .. }
            | Self::Verify { common, .. }
            | Self::Search { common, .. }
            | Self::SetTags { common, .. }
            | Self::GetTemplate { common, .. }
            | Self::ClassCount { common, .. }
            | Self::DeleteTemplate { common, .. } => common,
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.command.common().config.as_deref())?;

    match cli.command {
        Commands::HealthCheck { common } => health::run(&common, &config).await,
        Commands::LiveDetect {
            common,
            credentials,
            files,
            challenge,
        } => liveness::live_detect(&common, &credentials, &config, &files, challenge.as_deref()).await,
        Commands::VideoLiveDetect {
            common,
            credentials,
            files,
        } => liveness::video_live_detect(&common, &credentials, &config, &files).await,
        Commands::PhotoVerify {
            common,
            credentials,
            files,
            photo,
            disable_live,
            challenge,
        } => {
            let options = liveness::PhotoVerifyOptions {
                photo: photo.as_deref(),
                disable_live,
                challenge: challenge.as_deref(),
            };
            liveness::photo_verify(&common, &credentials, &config, &files, options).await
        }
        Commands::Enroll {
            common,
            credentials,
            class_id,
            files,
        } => face::enroll(&common, &credentials, &config, class_id, &files).await,
        Commands::Verify {
            common,
            credentials,
            class_id,
            files,
        } => face::verify(&common, &credentials, &config, class_id, &files).await,
        Commands::Search {
            common,
            credentials,
            files,
            tags,
        } => face::search(&common, &credentials, &config, &files, tags).await,
        Commands::SetTags {
            common,
            credentials,
            class_id,
            tags,
        } => face::set_tags(&common, &credentials, &config, class_id, tags).await,
        Commands::GetTemplate {
            common,
            credentials,
            class_id,
            thumbnails,
        } => face::get_template(&common, &credentials, &config, class_id, thumbnails).await,
        Commands::ClassCount {
            common,
            credentials,
            tags,
        } => face::class_count(&common, &credentials, &config, tags).await,
        Commands::DeleteTemplate {
            common,
            credentials,
            class_id,
        } => face::delete_template(&common, &credentials, &config, class_id).await,
    }
}

/// Reads an input file. A missing file is bad input; any other failure is not.
pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            BwsError::InvalidRequest(format!("file not found: {}", path.display()))
        } else {
            BwsError::ReadFile {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

pub async fn read_files(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    let mut contents = Vec::with_capacity(paths.len());
    for path in paths {
        contents.push(read_file(path).await?);
    }
    Ok(contents)
}

/// Builds the connection for one invocation: context, bearer token and
/// transport client. Key and token problems surface here, before any call.
pub fn connect(
    common: &CommonArgs,
    credentials: Option<&CredentialArgs>,
    config: &Config,
) -> Result<OperationDispatcher<dyn BwsTransport>> {
    let deadline = Deadline::from_millis(common.deadline);
    let transport = if common.rest {
        Transport::Http
    } else {
        Transport::Rpc
    };
    let credentials = credentials
        .map(|args| Credentials::new(args.client_id.clone(), &args.key))
        .transpose()?;
    let ctx = ConnectionContext::new(&common.host, credentials, transport, deadline)?;

    let bearer = ctx.credentials().map(|creds| bearer_for(creds, config)).transpose()?;
    let client: Arc<dyn BwsTransport> =
        ClientFactory::new(config.transport_options()).build(&ctx, bearer)?;

    Ok(OperationDispatcher::new(client, ctx.deadline()))
}

fn bearer_for(credentials: &Credentials, config: &Config) -> Result<BearerSource> {
    let issuer = TokenIssuer::new(
        credentials.client_id(),
        credentials.signing_key().clone(),
        config.token.ttl_minutes,
    )?
    .with_algorithm(config.token.algorithm);

    let bearer = BearerSource::from_policy(
        issuer,
        config.token.renewal,
        config.token.renew_margin_secs,
    )?;

    let token = bearer.token()?;
    let claims = token.decode_claims(credentials.signing_key(), config.token.algorithm)?;
    tracing::debug!(
        subject = %claims.sub,
        audience = %claims.aud,
        expires_at = %token.expires_at(),
        renewal = ?config.token.renewal,
        "issued service token"
    );
    Ok(bearer)
}

pub fn report<R: Render>(verbosity: Verbosity, outcome: &CallOutcome<R>) -> Result<()> {
    Reporter::stdio(verbosity).render(outcome)
}
