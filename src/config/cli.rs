use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the atelier binary.
#[derive(Debug, Parser)]
#[command(
    name = "atelier",
    version,
    about = "Portfolio content renderer and static site builder"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "ATELIER_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render a portable-text document to an HTML fragment on stdout.
    Render(RenderArgs),
    /// Fetch all content and write the static site artifacts.
    Build(BuildArgs),
    /// Fetch posts and write the RSS feed.
    Feed(FeedArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderArgs {
    /// Portable-text JSON file, either a block array or a document with a
    /// `body` field. Reads stdin when omitted.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Fetch the body of the post with this slug from the CMS instead.
    #[arg(long, value_name = "SLUG", conflicts_with = "file")]
    pub slug: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct BuildArgs {
    /// Override the output directory.
    #[arg(long = "output", short = 'o', value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct FeedArgs {
    /// Write the feed to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

/// Overrides accepted by every subcommand.
#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the public site URL used for feed links.
    #[arg(long = "site-url", value_name = "URL", global = true)]
    pub site_url: Option<String>,

    /// Override the CMS project identifier.
    #[arg(
        long = "sanity-project-id",
        env = "PUBLIC_SANITY_PROJECT_ID",
        value_name = "ID",
        global = true
    )]
    pub sanity_project_id: Option<String>,

    /// Override the CMS dataset.
    #[arg(
        long = "sanity-dataset",
        env = "PUBLIC_SANITY_DATASET",
        value_name = "NAME",
        global = true
    )]
    pub sanity_dataset: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}
