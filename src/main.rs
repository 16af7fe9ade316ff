mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;

use cli::{Cli, Command};
use emoframe::config::{self, Config};
use emoframe::{collate, report, CorpusDataset, Sample};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect emoframe.toml / global config
    let config_path = cli.config.clone().or_else(config::discover_config);
    let cfg = match config_path {
        Some(ref path) => match config::load_config(path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };

    // Merge: CLI values win when given
    let root: PathBuf = cli.root.clone().unwrap_or(cfg.corpus.root);
    let sessions = if cli.sessions.is_empty() {
        cfg.corpus.sessions
    } else {
        cli.sessions.clone()
    };

    if !root.exists() {
        anyhow::bail!("Corpus root not found: {}", root.display());
    }

    log::info!("Corpus root: {}", root.display());
    log::info!("Sessions: {:?}", sessions);

    let dataset = CorpusDataset::open(&root, &sessions, &cfg.corpus.annotation_extension)
        .with_context(|| format!("Failed to index corpus at {}", root.display()))?;

    match cli.command {
        Command::Summary => {
            println!("{}", report::summarize(dataset.index()));
        }
        Command::Export { output } => {
            let file = std::fs::File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            report::export_json(dataset.index(), std::io::BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", output.display()))?;
            log::info!("Wrote {} utterances to {}", dataset.len(), output.display());
        }
        Command::Show { index } => {
            let record = dataset.record(index)?;
            let sample = dataset.get(index)?;
            let [channels, samples] = sample.shape();
            println!("path:       {}", sample.path.display());
            println!("file id:    {}", record.file_id);
            println!("span:       {:.4}s - {:.4}s", record.start, record.end);
            println!("shape:      {} x {}", channels, samples);
            println!("rate:       {} Hz", sample.sample_rate());
            println!("emotion:    {} ({})", sample.emotion, sample.emotion.code());
            println!(
                "affect:     activation {:.2}, valence {:.2}, dominance {:.2}",
                sample.activation, sample.valence, sample.dominance
            );
        }
        Command::Frames { start, batch_size } => {
            let batch_size = batch_size.unwrap_or(cfg.batch.size).max(1);
            let end = start.saturating_add(batch_size).min(dataset.len());
            if start >= end {
                anyhow::bail!("Start index {} out of range ({} utterances)", start, dataset.len());
            }

            let pb = ProgressBar::new((end - start) as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} utterances")?
                    .progress_chars("=>-"),
            );

            // Accessor calls are independent, so the batch loads in parallel
            let batch: Vec<Sample> = (start..end)
                .into_par_iter()
                .map(|i| {
                    let sample = dataset.get(i);
                    pb.inc(1);
                    sample
                })
                .collect::<emoframe::Result<_>>()?;
            pb.finish_and_clear();

            let frames = collate(&batch)?;
            let [n, channels, length] = frames.shape();
            println!("Frames: {} x {} x {}", n, channels, length);
            for (i, (sample, count)) in batch.iter().zip(frames.frame_counts()).enumerate() {
                println!(
                    "  [{:4}] {:>6} samples -> {:>4} frames  {}",
                    start + i,
                    sample.audio.len(),
                    count,
                    sample.path.display()
                );
            }
        }
    }

    Ok(())
}
