use crate::commands::{self, Command, HELP, Tab};
use crate::config::Config;
use crate::messages::UploadState;
use crate::profile::{ProfileEditor, ProfileField};
use crate::screens::{self, FeedView};
use crate::services::{
    ConsoleNotifier, FeedClient, FileMediaSource, HttpTransferChannel, MediaLibraryGate, Notifier,
    upload_client,
};
use crate::upload::{UploadOutcome, UploadSettings, UploadWorkflow};

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

pub struct App {
    tab: Tab,
    notifier: Arc<dyn Notifier>,
    media: Arc<FileMediaSource>,
    workflow: UploadWorkflow,
    feed: FeedClient,
    feed_view: FeedView,
    profile: ProfileEditor,
    command_rx: mpsc::Receiver<Command>,
}

impl App {
    pub async fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;
        let upload_http = upload_client(config.request_timeout(), config.upload_timeout())
            .context("Failed to build upload client")?;

        let media_dir = config.media_dir()?;
        let console = Arc::new(ConsoleNotifier::new());
        let notifier: Arc<dyn Notifier> = console.clone();
        let media = Arc::new(FileMediaSource::new(media_dir.clone()));
        let workflow = UploadWorkflow::new(
            Arc::new(MediaLibraryGate::new(media_dir)),
            media.clone(),
            Arc::new(HttpTransferChannel::new(upload_http, config.upload_url())),
            notifier.clone(),
            UploadSettings {
                max_upload_bytes: config.max_upload_bytes(),
                progress_interval: config.progress_interval(),
            },
        );
        let feed = FeedClient::new(client, config.videos_url());
        let profile = ProfileEditor::new(config.profile.clone(), config.profile_save_delay())?;

        console.attach_upload_state(workflow.subscribe());
        Self::spawn_progress_reporter(console, workflow.subscribe());
        let command_rx = Self::setup_command_input()?;

        tracing::info!("Ready! Talking to {}", config.api_url);
        println!("{}", HELP);

        Ok(Self {
            tab: Tab::Home,
            notifier,
            media,
            workflow,
            feed,
            feed_view: FeedView::default(),
            profile,
            command_rx,
        })
    }

    pub async fn run(mut self) -> Result<()> {
        self.show_home().await;

        loop {
            tracing::debug!("Main loop: waiting for command");
            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(Command::Quit) | None => break,
                        Some(command) => {
                            if let Err(e) = self.handle_command(command).await {
                                tracing::warn!("Command failed: {:#}", e);
                                println!("{}", e);
                            }
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received Ctrl+C, shutting down");
                    break;
                }
            }
        }

        tracing::info!("reelbox shutdown complete");
        Ok(())
    }

    async fn handle_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Show(Tab::Home) | Command::Refresh => self.show_home().await,
            Command::Show(Tab::Profile) => self.show_profile(),
            Command::Play(position) => {
                if self.tab != Tab::Home {
                    self.show_home().await;
                }
                print!("{}", self.feed_view.toggle_play(position)?);
            }
            Command::ToggleEdit => {
                self.profile.toggle_editing();
                self.show_profile();
            }
            Command::Set(field, value) => self.set_profile_field(field, &value)?,
            Command::Save => {
                let notification = self.profile.save().await?;
                tracing::debug!("Saved profile: {:?}", self.profile.profile());
                self.notifier.notify(&notification);
                self.show_profile();
            }
            Command::Upload(path) => self.handle_upload(path).await,
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }

        Ok(())
    }

    async fn show_home(&mut self) {
        self.tab = Tab::Home;
        match self.feed.fetch_videos().await {
            Ok(videos) => {
                self.feed_view.load(videos);
                print!("{}", self.feed_view.render());
            }
            Err(e) => {
                tracing::warn!("Failed to load videos: {}", e);
                self.feed_view.clear();
                print!("{}", screens::render_feed_error(e.user_message()));
            }
        }
    }

    fn show_profile(&mut self) {
        self.tab = Tab::Profile;
        print!(
            "{}",
            screens::render_profile(self.profile.displayed(), self.profile.is_editing())
        );
    }

    fn set_profile_field(&mut self, field: ProfileField, value: &str) -> Result<()> {
        self.profile.set_field(field, value)?;
        self.show_profile();
        Ok(())
    }

    async fn handle_upload(&mut self, path: Option<PathBuf>) {
        if self.tab != Tab::Profile {
            self.show_profile();
        }

        tracing::debug!("Upload requested in phase {:?}", self.workflow.state().phase);
        self.media.stage(path.map(expand_home)).await;
        match self.workflow.request_upload().await {
            UploadOutcome::Cancelled => println!("No video selected"),
            UploadOutcome::Busy => println!("An upload is already running"),
            outcome => tracing::debug!("Upload finished: {:?}", outcome),
        }
    }

    fn spawn_progress_reporter(
        console: Arc<ConsoleNotifier>,
        mut rx: watch::Receiver<UploadState>,
    ) {
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                console.show_progress();
            }
        });
    }

    fn setup_command_input() -> Result<mpsc::Receiver<Command>> {
        let (command_tx, command_rx) = mpsc::channel(10);
        std::thread::Builder::new()
            .name("stdin".to_string())
            .spawn(move || {
                if let Err(e) = commands::monitor_stdin(command_tx) {
                    tracing::error!("Command input stopped: {:#}", e);
                }
            })
            .context("Failed to start command input thread")?;
        Ok(command_rx)
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    let Ok(home) = std::env::var("HOME") else {
        return path;
    };
    if let Ok(rest) = path.strip_prefix("~") {
        return PathBuf::from(home).join(rest);
    }
    path
}
