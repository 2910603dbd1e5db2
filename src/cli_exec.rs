use anyhow::{Context, Result};
use time::OffsetDateTime;

use gallery::aggregate::Aggregator;
use gallery::filter::{self, Query, TagPolicy};
use gallery::model::{GalleryConfig, PackageRecord, Snapshot};
use gallery::timefmt::fmt_ts;

use crate::Commands;
use crate::cli_commands::browse::{ListArgs, ShowArgs, TagsArgs};
use crate::cli_commands::package::{DownloadArgs, ReadmeArgs};

pub(crate) fn handle_command(
    command: Commands,
    mut config: GalleryConfig,
    runtime: &tokio::runtime::Runtime,
) -> Result<()> {
    // Single-package commands never show timestamps.
    if matches!(command, Commands::Readme(_) | Commands::Download(_)) {
        config.fetch_history = false;
    }
    let aggregator = Aggregator::new(config)?;
    let snapshot = runtime.block_on(load(&aggregator))?;

    match command {
        Commands::List(args) => cmd_list(&snapshot, args),
        Commands::Tags(args) => cmd_tags(&snapshot, args),
        Commands::Show(args) => cmd_show(&snapshot, args),
        Commands::Readme(args) => {
            let record = require_record(&snapshot, &args.name)?;
            runtime.block_on(cmd_readme(&aggregator, record, &args))
        }
        Commands::Download(args) => {
            let record = require_record(&snapshot, &args.name)?;
            runtime.block_on(cmd_download(&aggregator, record, &args))
        }
    }
}

async fn load(aggregator: &Aggregator) -> Result<Snapshot> {
    let report = aggregator.load().await?;
    if report.failed_folders() > 0 {
        eprintln!(
            "warning: {} folder(s) could not be listed",
            report.failed_folders()
        );
    }
    Ok(aggregator.snapshot())
}

fn require_record<'a>(snapshot: &'a Snapshot, name: &str) -> Result<&'a PackageRecord> {
    let record = snapshot
        .find(name)
        .with_context(|| format!("no package named {:?}", name))?;
    if let Some(err) = &record.fetch_error {
        anyhow::bail!("package {:?} is unavailable: {}", record.raw_name, err);
    }
    Ok(record)
}

fn cmd_list(snapshot: &Snapshot, args: ListArgs) -> Result<()> {
    let policy = if args.match_all {
        TagPolicy::All
    } else {
        TagPolicy::Any
    };
    let query = Query::text(args.query.unwrap_or_default())
        .with_tags(args.tags)
        .with_policy(policy);
    let visible = filter::visible(&snapshot.records, &query);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&visible).context("serialize packages json")?
        );
        return Ok(());
    }

    if visible.is_empty() {
        println!("No packages");
        return Ok(());
    }
    let now = OffsetDateTime::now_utc();
    for r in visible {
        println!("{}", list_line(r, now));
    }
    Ok(())
}

fn list_line(r: &PackageRecord, now: OffsetDateTime) -> String {
    let mut line = r.title.clone();
    if !r.tags.is_empty() {
        line.push_str(&format!("  [{}]", r.tags.join(", ")));
    }
    if let Some(err) = &r.fetch_error {
        line.push_str(&format!("  (unavailable: {})", err));
        return line;
    }
    if let Some(ts) = &r.updated_at {
        line.push_str(&format!("  updated {}", fmt_ts(ts, now)));
    }
    let mut missing = Vec::new();
    if r.preview_ref.is_none() {
        missing.push("preview");
    }
    if r.readme_ref.is_none() {
        missing.push("readme");
    }
    if r.config_ref.is_none() {
        missing.push("config");
    }
    if !missing.is_empty() {
        line.push_str(&format!("  (no {})", missing.join("/")));
    }
    line
}

fn cmd_tags(snapshot: &Snapshot, args: TagsArgs) -> Result<()> {
    let counts = filter::tag_counts(&snapshot.records);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&counts).context("serialize tags json")?
        );
        return Ok(());
    }
    if counts.is_empty() {
        println!("No tags");
    }
    for (tag, n) in counts {
        println!("{} ({})", tag, n);
    }
    Ok(())
}

fn cmd_show(snapshot: &Snapshot, args: ShowArgs) -> Result<()> {
    let record = snapshot
        .find(&args.name)
        .with_context(|| format!("no package named {:?}", args.name))?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(record).context("serialize package json")?
        );
        return Ok(());
    }

    let now = OffsetDateTime::now_utc();
    println!("title: {}", record.title);
    println!("folder: {}", record.raw_name);
    if !record.tags.is_empty() {
        println!("tags: {}", record.tags.join(", "));
    }
    if let Some(err) = &record.fetch_error {
        println!("error: {}", err);
    }
    let or_none = |v: &Option<String>| v.clone().unwrap_or_else(|| "(none)".to_string());
    println!("preview: {}", or_none(&record.preview_ref));
    println!("readme: {}", or_none(&record.readme_ref));
    println!("config: {}", or_none(&record.config_ref));
    if let Some(ts) = &record.created_at {
        println!("created: {}", fmt_ts(ts, now));
    }
    if let Some(ts) = &record.updated_at {
        println!("updated: {}", fmt_ts(ts, now));
    }
    Ok(())
}

async fn cmd_readme(
    aggregator: &Aggregator,
    record: &PackageRecord,
    args: &ReadmeArgs,
) -> Result<()> {
    let doc = gallery::docs::load_doc(aggregator.client(), record).await?;
    if args.plain {
        for line in gallery::docs::render_lines(&doc, args.width) {
            println!("{}", line);
        }
    } else {
        println!("{}", doc);
    }
    Ok(())
}

async fn cmd_download(
    aggregator: &Aggregator,
    record: &PackageRecord,
    args: &DownloadArgs,
) -> Result<()> {
    let dir = match &args.out {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("get current dir")?,
    };
    let saved = gallery::download::download_config(aggregator.client(), record, &dir).await?;
    println!(
        "Saved {} ({} bytes, blake3 {})",
        saved.path.display(),
        saved.bytes,
        &saved.digest[..16]
    );
    Ok(())
}
