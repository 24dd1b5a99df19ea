use clap::Args;

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Exclude note paths by glob pattern, relative to the root.
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,
    /// Include hidden files and directories in the scan.
    #[arg(long, default_value_t = false)]
    pub include_hidden: bool,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    /// The text typed so far inside `[[`.
    pub prefix: String,
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct BacklinksArgs {
    /// Note key, title, or alias.
    pub note: String,
}

#[derive(Debug, Args)]
pub struct TagsArgs {
    /// Only tags equal to this prefix or nested under it (`project` matches
    /// `project` and `project/backend`, not `projectile`).
    #[arg(long)]
    pub prefix: Option<String>,
}
