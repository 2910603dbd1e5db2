use clap::Args;

#[derive(Args)]
pub(crate) struct ListArgs {
    /// Case-insensitive text matched against titles and tags
    #[arg(short = 'q', long)]
    pub(crate) query: Option<String>,
    /// Only show packages with this tag (repeatable)
    #[arg(short = 't', long = "tag")]
    pub(crate) tags: Vec<String>,
    /// Require every --tag instead of any of them
    #[arg(long)]
    pub(crate) match_all: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct TagsArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Folder name or title
    pub(crate) name: String,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
