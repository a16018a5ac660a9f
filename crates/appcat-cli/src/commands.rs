use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

use appcat_server::{CatalogServer, ServerConfig};
use appcat_store::{CatalogReader, CatalogWriter, InMemoryCatalog, SnapshotFile};
use appcat_types::{CatalogDocument, UploadSummary};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let data_file = cli.data_file();
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args, cli.data_file),
        Command::Stats => cmd_stats(&data_file, format),
        Command::Categories => cmd_categories(&data_file, format),
        Command::Search(args) => cmd_search(&data_file, &args.query, format),
        Command::Export(args) => cmd_export(&data_file, args),
        Command::Import(args) => cmd_import(&data_file, &args.file, format),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load the catalog stored at `path`; the file must exist.
fn open_store(path: &Path) -> anyhow::Result<InMemoryCatalog> {
    let document = SnapshotFile::new(path)
        .load()
        .with_context(|| format!("reading {}", path.display()))?
        .with_context(|| format!("no catalog at {}", path.display()))?;
    Ok(InMemoryCatalog::from_document(document))
}

/// Merge `source` into the catalog at `data_file`, creating it if needed.
fn import_file(data_file: &Path, source: &Path) -> anyhow::Result<UploadSummary> {
    let text = std::fs::read_to_string(source)
        .with_context(|| format!("reading {}", source.display()))?;
    let incoming: CatalogDocument = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a catalog document", source.display()))?;

    let file = SnapshotFile::new(data_file);
    let store = InMemoryCatalog::from_document(file.load()?.unwrap_or_default());
    let summary = store.merge(incoming)?;
    file.save(&store.snapshot()?)?;
    Ok(summary)
}

fn cmd_serve(args: ServeArgs, data_file: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(path) = data_file {
        config.data_file = path;
    }
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = Some(dir);
    }
    if args.no_seed {
        config.seed_defaults = false;
    }

    println!(
        "{} appcat server on {} (data: {})",
        "▶".green().bold(),
        format!("http://{}", config.bind_addr).bold(),
        config.data_file.display()
    );
    let server = CatalogServer::open(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_stats(data_file: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let stats = open_store(data_file)?.stats()?;
    if format == OutputFormat::Json {
        return print_json(&stats);
    }

    println!("Categories:    {}", stats.total_categories.to_string().bold());
    println!("Applications:  {}", stats.total_applications.to_string().bold());
    println!("Recently added: {}", stats.recently_added.to_string().green());
    for (name, count) in &stats.category_counts {
        println!("  {:<24} {}", name.cyan(), count);
    }
    Ok(())
}

fn cmd_categories(data_file: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let names = open_store(data_file)?.categories()?;
    if format == OutputFormat::Json {
        return print_json(&names);
    }
    if names.is_empty() {
        println!("No categories.");
    }
    for name in names {
        println!("{}", name.cyan());
    }
    Ok(())
}

fn cmd_search(data_file: &Path, query: &str, format: OutputFormat) -> anyhow::Result<()> {
    let results = open_store(data_file)?.search(query)?;
    if format == OutputFormat::Json {
        return print_json(&results);
    }

    match results {
        None => println!("No applications match {}.", query.yellow()),
        Some(category) => {
            println!("{} match(es) for {}", category.application_count(), query.yellow());
            for app in &category.applications {
                let pairs: Vec<String> = app.entries().iter().map(ToString::to_string).collect();
                println!("  {}", pairs.join(", "));
            }
        }
    }
    Ok(())
}

fn cmd_export(data_file: &Path, args: ExportArgs) -> anyhow::Result<()> {
    let document = open_store(data_file)?.export(args.category.as_deref())?;
    let json = serde_json::to_string_pretty(&document)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{} Exported to {}", "✓".green().bold(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_import(data_file: &Path, source: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let summary = import_file(data_file, source)?;
    if format == OutputFormat::Json {
        return print_json(&summary);
    }
    println!(
        "{} Imported {}: {} categories, {} applications added",
        "✓".green().bold(),
        source.display(),
        summary.added_categories.to_string().bold(),
        summary.added_applications.to_string().bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use appcat_types::{ApplicationRecord, CategoryRecord};

    use super::*;

    #[test]
    fn open_store_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_store(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn import_creates_and_merges() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.json");
        let source = dir.path().join("upload.json");
        let doc = CatalogDocument::new(vec![CategoryRecord {
            category: "Editors".into(),
            applications: vec![ApplicationRecord::new(["vim", "neovim"], ["Vim", "Neovim"])],
        }]);
        std::fs::write(&source, serde_json::to_string(&doc).unwrap()).unwrap();

        let first = import_file(&data, &source).unwrap();
        assert_eq!(first.added_categories, 1);
        assert_eq!(first.added_applications, 2);

        let second = import_file(&data, &source).unwrap();
        assert!(second.is_empty());

        let store = open_store(&data).unwrap();
        assert_eq!(store.categories().unwrap(), vec!["Editors"]);
    }

    #[test]
    fn import_rejects_non_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("upload.json");
        std::fs::write(&source, "[1, 2, 3]").unwrap();
        assert!(import_file(&dir.path().join("data.json"), &source).is_err());
    }
}
