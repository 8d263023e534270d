use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, warn};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;

use tweetd::{
    cache, notify, params,
    repo::{self, Outcome},
    server::{ActionContext, ActionResponse, TweetActionHandler, errors::ServerError},
    store, types,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(version, about = "Tweet storage backend")]
struct Cli {
    /// Abort the command after the given number of milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply the database migrations
    Migrate,
    /// Post a new tweet
    Create {
        #[arg(long)]
        author: String,
        text: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Show a single tweet
    Get { tweet_id: String },
    /// List tweets from the oldest one
    List {
        /// Cursor returned by a previous page
        #[arg(long, default_value = "")]
        cursor: String,
        /// Follow cursors until the last page
        #[arg(long)]
        all: bool,
    },
    /// Change the text and optionally the image of a tweet
    Update {
        tweet_id: String,
        #[arg(long)]
        user: String,
        text: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Delete a tweet
    Delete {
        tweet_id: String,
        #[arg(long)]
        user: String,
    },
    /// Download the image attached to a tweet
    Image {
        tweet_id: String,
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct ImageArgs {
    /// Image file to attach
    #[arg(long)]
    image: Option<PathBuf>,
    /// Object name of the image, defaults to the file name
    #[arg(long, requires = "image")]
    image_name: Option<String>,
    #[arg(long, default_value = store::DEFAULT_CONTENT_TYPE)]
    content_type: String,
}

impl ImageArgs {
    async fn load(self) -> Result<Option<types::ImageUpload>, CliError> {
        let Some(path) = self.image else {
            return Ok(None);
        };

        let name = match self.image_name {
            Some(name) => name,
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        };

        debug!("reading image from `{}`", path.display());
        let bytes = tokio::fs::read(&path).await?;

        Ok(Some(types::ImageUpload::new(
            name,
            self.content_type,
            Bytes::from(bytes),
        )))
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("configuration error :: {0}")]
    Params(#[from] params::ParamsError),
    #[error("repository error :: {0}")]
    Repo(#[from] repo::Error),
    #[error("store error :: {0}")]
    Store(#[from] store::Error),
    #[error("cache error :: {0}")]
    Cache(#[from] cache::Error),
    #[error("notification error :: {0}")]
    Notify(#[from] notify::Error),
    #[error("{:?} :: {}", .0.code(), .0.message())]
    Request(tonic::Status),
    #[error("io error :: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error :: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ServerError> for CliError {
    fn from(value: ServerError) -> Self {
        Self::Request(value.into())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    params::init(params::Configurables::from_env()?);
    let params = params::configurables();

    let repository = repo::Repository::try_new(&params.database_url).await?;

    let command = match cli.command {
        Command::Migrate => {
            repository.migrate().await?;
            println!("{}", "database up to date".green());
            return Ok(());
        }
        command => command,
    };

    let store: store::StoreRef = Arc::new(store::Store::try_from_url(
        &params.store_url,
        &params.image_bucket,
    )?);
    let cache = cache::connect(params.cache_url.as_deref()).await?;
    let publisher = notify::connect(params.amqp.as_ref()).await?;

    let facade = repo::FacadeTweet::new(Arc::new(repository), cache, store, publisher);

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, canceling request");
            token.cancel();
        }
    });

    let timeout = cli
        .timeout_ms
        .map(Duration::from_millis)
        .or(params.request_timeout);
    let ctx = ActionContext::new(Arc::new(facade), cancel).with_timeout(timeout);

    match command {
        Command::Migrate => Ok(()),
        Command::Create {
            author,
            text,
            image,
        } => {
            let image = image.load().await?;
            print(TweetActionHandler::create(&ctx, &author, text, image).await?)
        }
        Command::Get { tweet_id } => print(TweetActionHandler::get(&ctx, &tweet_id).await?),
        Command::List { cursor, all } => {
            let mut cursor = cursor;
            loop {
                let outcome = TweetActionHandler::list(&ctx, &cursor).await?;
                let next = match outcome.value() {
                    ActionResponse::Page(page) => page.next_cursor.clone(),
                    _ => String::new(),
                };
                print(outcome)?;

                if !all || next.is_empty() {
                    return Ok(());
                }
                cursor = next;
            }
        }
        Command::Update {
            tweet_id,
            user,
            text,
            image,
        } => {
            let image = image.load().await?;
            print(TweetActionHandler::update(&ctx, &tweet_id, &user, text, image).await?)
        }
        Command::Delete { tweet_id, user } => {
            print(TweetActionHandler::delete(&ctx, &tweet_id, &user).await?)
        }
        Command::Image { tweet_id, output } => {
            let (response, advisories) = TweetActionHandler::image(&ctx, &tweet_id)
                .await?
                .into_parts();
            if let ActionResponse::Image(blob) = &response {
                tokio::fs::write(&output, &blob.bytes).await?;
                println!(
                    "{} {} ({}, {} bytes)",
                    "saved".green(),
                    output.display(),
                    blob.content_type,
                    blob.bytes.len()
                );
            }
            print_advisories(&advisories);
            Ok(())
        }
    }
}

fn print(outcome: Outcome<ActionResponse>) -> Result<(), CliError> {
    let (response, advisories) = outcome.into_parts();

    match response {
        ActionResponse::Created {
            tweet_id,
            notification_published,
        } => {
            println!("{} {}", "created".green(), tweet_id);
            if !notification_published {
                println!("{}", "followers were not notified".yellow());
            }
        }
        ActionResponse::Tweet(tweet) => println!("{}", serde_json::to_string_pretty(&tweet)?),
        ActionResponse::Page(page) => {
            for tweet in &page.tweets {
                println!("{}", serde_json::to_string(tweet)?);
            }
            if page.is_last() {
                println!("{}", "end of stream".dimmed());
            } else {
                println!("{} {}", "next cursor:".dimmed(), page.next_cursor);
            }
        }
        ActionResponse::Image(blob) => {
            println!("{} ({} bytes)", blob.content_type, blob.bytes.len());
        }
        ActionResponse::Empty => println!("{}", "done".green()),
    }

    print_advisories(&advisories);
    Ok(())
}

fn print_advisories(advisories: &[repo::Advisory]) {
    for advisory in advisories {
        eprintln!("{} {}", "warning:".yellow().bold(), advisory);
    }
}
