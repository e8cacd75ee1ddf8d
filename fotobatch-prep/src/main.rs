//! fotobatch-prep - Batch preparation tool for museum photo uploads
//!
//! Command-line glue around the preparation engine. All I/O happens
//! here: the engine itself works on in-memory data and hands results
//! back for atomic persistence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fotobatch_common::config::RunConfig;
use fotobatch_common::mappings::MappingStore;
use fotobatch_common::records::{ArchiveCard, PhotoRecord};
use fotobatch_prep::render::RenderOutcome;
use fotobatch_prep::{builder, merge, report, tabular};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for fotobatch-prep
#[derive(Parser, Debug)]
#[command(name = "fotobatch-prep")]
#[command(about = "Batch preparation tool for museum photo uploads")]
#[command(version)]
struct Args {
    /// Path to a TOML run-configuration file
    #[arg(short, long, env = "FOTOBATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Batch label override, e.g. "2026-08"
    #[arg(long)]
    batch_label: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge two institutions' photo + archive-card dataset pairs
    Merge {
        /// Primary photo dataset
        data_a: PathBuf,
        /// Primary archive-card dataset
        cards_a: PathBuf,
        /// Secondary photo dataset
        data_b: PathBuf,
        /// Secondary archive-card dataset
        cards_b: PathBuf,
        /// Base name for the merged output files (without extension)
        #[arg(long)]
        out_base: PathBuf,
    },
    /// Update the mapping store from a photo + archive-card dataset pair
    UpdateMappings {
        /// Photo dataset (single institution or already merged)
        data: PathBuf,
        /// Archive-card dataset
        cards: PathBuf,
        /// Mapping store file; created when missing
        #[arg(long)]
        mappings: PathBuf,
    },
    /// Render publication documents against a curated mapping store
    MakeInfo {
        /// Photo dataset (single institution or already merged)
        data: PathBuf,
        /// Archive-card dataset
        cards: PathBuf,
        /// Curated mapping store file
        #[arg(long)]
        mappings: PathBuf,
        /// Base name for the info and reject output files
        #[arg(long)]
        out_base: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fotobatch_prep=info,fotobatch_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification for instant startup feedback
    info!(
        "Starting fotobatch-prep v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = RunConfig::load(args.config.as_deref())?.with_batch_label(args.batch_label);

    match args.command {
        Command::Merge {
            data_a,
            cards_a,
            data_b,
            cards_b,
            out_base,
        } => run_merge(&config, &data_a, &cards_a, &data_b, &cards_b, &out_base),
        Command::UpdateMappings {
            data,
            cards,
            mappings,
        } => run_update_mappings(&config, &data, &cards, &mappings),
        Command::MakeInfo {
            data,
            cards,
            mappings,
            out_base,
        } => run_make_info(&config, &data, &cards, &mappings, &out_base),
    }
}

fn load_pair(
    config: &RunConfig,
    data: &Path,
    cards: &Path,
) -> Result<(Vec<PhotoRecord>, Vec<ArchiveCard>)> {
    let data_text = fs::read_to_string(data)
        .with_context(|| format!("cannot read photo dataset {}", data.display()))?;
    let cards_text = fs::read_to_string(cards)
        .with_context(|| format!("cannot read archive dataset {}", cards.display()))?;
    let photos = tabular::photo_records(&data_text, config.delimiter, config.list_delimiter)?;
    let archive = tabular::archive_cards(&cards_text, config.delimiter, config.list_delimiter)?;
    info!(photos = photos.len(), cards = archive.len(), "loaded dataset pair");
    Ok((photos, archive))
}

fn run_merge(
    config: &RunConfig,
    data_a: &Path,
    cards_a: &Path,
    data_b: &Path,
    cards_b: &Path,
    out_base: &Path,
) -> Result<()> {
    let (photos_a, archive_a) = load_pair(config, data_a, cards_a)?;
    let (photos_b, archive_b) = load_pair(config, data_b, cards_b)?;

    let outcome = merge::merge(&photos_a, &archive_a, &photos_b, &archive_b);
    for diagnostic in &outcome.diagnostics {
        warn!(%diagnostic, "merge diagnostic");
    }
    for card in &outcome.orphan_cards {
        warn!(card_id = %card.card_id, post_number = %card.post_number, "orphan archive card");
    }

    let photos: Vec<PhotoRecord> = outcome.records.iter().map(|r| r.photo.clone()).collect();
    // all cards survive the merge: attached ones in record order, then orphans
    let mut cards: Vec<ArchiveCard> = outcome
        .records
        .iter()
        .flat_map(|r| r.cards.iter().cloned())
        .collect();
    cards.extend(outcome.orphan_cards.iter().cloned());

    let data_out = out_base.with_extension("csv");
    let cards_out = append_to_stem(out_base, "_arkiv").with_extension("csv");
    fotobatch_common::fsio::write_atomic(
        &data_out,
        &tabular::write_photo_records(&photos, config.delimiter, config.list_delimiter),
    )?;
    fotobatch_common::fsio::write_atomic(
        &cards_out,
        &tabular::write_archive_cards(&cards, config.delimiter),
    )?;
    info!(
        data = %data_out.display(),
        cards = %cards_out.display(),
        records = photos.len(),
        "merged datasets written"
    );
    Ok(())
}

fn run_update_mappings(
    config: &RunConfig,
    data: &Path,
    cards: &Path,
    mappings: &Path,
) -> Result<()> {
    let (photos, archive) = load_pair(config, data, cards)?;
    let outcome = merge::merge(&photos, &archive, &[], &[]);
    for diagnostic in &outcome.diagnostics {
        warn!(%diagnostic, "merge diagnostic");
    }

    let prior = MappingStore::load_or_empty(mappings)?;
    let updated = builder::update_mappings(&outcome.records, &prior);
    updated.save(mappings)?;
    Ok(())
}

fn run_make_info(
    config: &RunConfig,
    data: &Path,
    cards: &Path,
    mappings: &Path,
    out_base: &Path,
) -> Result<()> {
    let (photos, archive) = load_pair(config, data, cards)?;
    let outcome = merge::merge(&photos, &archive, &[], &[]);
    for diagnostic in &outcome.diagnostics {
        warn!(%diagnostic, "merge diagnostic");
    }

    let store = MappingStore::load_or_empty(mappings)?;
    let renderer = fotobatch_prep::Renderer::new(&store, config);

    let mut documents = Vec::new();
    let mut rejections = Vec::new();
    for record in &outcome.records {
        match renderer.render(record) {
            RenderOutcome::Published(doc) => {
                for note in &doc.notes {
                    warn!(photo_number = %doc.photo_number, %note, "render note");
                }
                documents.push(*doc);
            }
            RenderOutcome::Rejected(rejection) => rejections.push(rejection),
        }
    }

    let info_out = append_to_stem(out_base, "_info").with_extension("json");
    let rejects_out = append_to_stem(out_base, "_rejects").with_extension("json");
    report::write_output_units(&info_out, &documents)?;
    report::write_reject_report(&rejects_out, &rejections)?;
    info!(
        published = documents.len(),
        rejected = rejections.len(),
        "make-info complete"
    );
    Ok(())
}

fn append_to_stem(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    base.with_file_name(name)
}
