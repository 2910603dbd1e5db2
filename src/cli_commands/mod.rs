use clap::Subcommand;

pub(crate) mod browse;
pub(crate) mod package;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List packages, optionally filtered
    List(browse::ListArgs),

    /// List every tag in use
    Tags(browse::TagsArgs),

    /// Show one package
    Show(browse::ShowArgs),

    /// Print a package's documentation
    Readme(package::ReadmeArgs),

    /// Save a package's configuration file
    Download(package::DownloadArgs),
}
