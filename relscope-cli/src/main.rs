// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Relscope CLI
//!
//! Runs relation queries against an index snapshot.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relscope_core::{RelationKey, SearchConfig};
use relscope_index::{IndexSnapshot, MemoryRelationIndex, ScopeTree};
use relscope_query::{DocumentResult, Search, SearchStats};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "relscope")]
#[command(about = "Relscope - relation-based document retrieval", long_about = None)]
struct Cli {
    /// Index snapshot (JSON)
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Search config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank documents for a list of candidate relations
    Search {
        /// Relation key, in query order (repeatable)
        #[arg(short, long = "relation", required = true)]
        relations: Vec<u64>,

        /// Maximum number of documents to return
        #[arg(short = 'n', long, default_value = "10")]
        max_results: usize,
    },

    /// Show snapshot statistics
    Stats,
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    stats: SearchStats,
    results: &'a [DocumentResult],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SearchConfig::default(),
    };
    let (index, scopes) = open_snapshot(&cli.snapshot)?;

    match cli.command {
        Commands::Search {
            relations,
            max_results,
        } => {
            let candidates: Vec<RelationKey> = relations.into_iter().map(RelationKey).collect();
            let mut search = Search::with_config(&index, &scopes, &candidates, config)
                .context("Failed to prepare search")?;
            let results = search.search(max_results).context("Search failed")?;

            if cli.json {
                let output = SearchOutput {
                    stats: search.stats(),
                    results: &results,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_results(&results);
            }
        }

        Commands::Stats => {
            let stats = index.stats();
            if cli.json {
                let output = serde_json::json!({
                    "relations": stats.relations,
                    "postings": stats.postings,
                    "distinct_scopes": stats.distinct_scopes,
                    "scopes": scopes.len(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Snapshot {}:", cli.snapshot.display());
                println!("  Relations:       {}", stats.relations);
                println!("  Postings:        {}", stats.postings);
                println!("  Distinct scopes: {}", stats.distinct_scopes);
                println!("  Scope nodes:     {}", scopes.len());
            }
        }
    }

    Ok(())
}

fn open_snapshot(path: &Path) -> Result<(MemoryRelationIndex, ScopeTree)> {
    let snapshot = IndexSnapshot::load(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let built = snapshot.build().context("Invalid snapshot")?;
    info!(
        path = %path.display(),
        relations = snapshot.relations.len(),
        scopes = snapshot.scopes.len(),
        "Loaded snapshot"
    );
    Ok(built)
}

fn print_results(results: &[DocumentResult]) {
    if results.is_empty() {
        println!("No matching documents");
        return;
    }

    println!(
        "{:<5} {:<14} {:>10}  {:<24} sub-scopes",
        "rank", "document", "score", "relations"
    );
    for (rank, result) in results.iter().enumerate() {
        let relations: Vec<String> = result.relations.iter().map(|r| r.0.to_string()).collect();
        let sub_scopes: Vec<String> = result.sub_scopes.iter().map(|s| s.0.to_string()).collect();
        println!(
            "{:<5} {:<14} {:>10.4}  {:<24} {}",
            rank + 1,
            result.document.0,
            result.score,
            relations.join(","),
            sub_scopes.join(",")
        );
    }
}
