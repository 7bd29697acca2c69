use std::{
    collections::BTreeSet,
    io::{stdin, BufRead},
    path::PathBuf,
};

use anyhow::{bail, Context as _};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wpm_ranking::{evaluate, FeatureTable, Interval, RankConfig, Row};

/// Rank the alternatives of a CSV table read from stdin by their weighted product score. The first
/// line names the features, and every other cell must be numeric.
#[derive(Parser, Debug)]
struct Args {
    /// TOML file with `[interval]` (lo, hi) and `[weights]` tables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Feature weight as `name=value`, negative for cost criteria. May be repeated, and overrides
    /// weights from the config file.
    #[arg(long = "weight", value_parser = parse_weight)]
    weights: Vec<(String, f64)>,
    /// Lower bound of the scaling interval.
    #[arg(long, requires = "hi")]
    lo: Option<f64>,
    /// Upper bound of the scaling interval.
    #[arg(long, requires = "lo")]
    hi: Option<f64>,
    /// Only print the best N alternatives.
    #[arg(long)]
    top: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let table = read_table(stdin().lock())?;
    tracing::info!(
        alternatives = table.len(),
        features = table.columns().len(),
        interval = ?config.interval,
        "read table"
    );

    let ranking = evaluate(&table, &config)?;
    println!("rank\trow\tscore\t{}", table.columns().join("\t"));
    for (rank, result) in ranking
        .iter()
        .take(args.top.unwrap_or(usize::MAX))
        .enumerate()
    {
        let values: Vec<String> = result.original.iter().map(|(_, v)| v.to_string()).collect();
        println!(
            "{}\t{}\t{:.6}\t{}",
            rank + 1,
            result.row_index,
            result.score.as_f64(),
            values.join("\t")
        );
    }
    Ok(())
}

fn parse_weight(arg: &str) -> anyhow::Result<(String, f64)> {
    let (name, value) = arg.split_once('=').context("expected name=value")?;
    let value = value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid weight for {name:?}"))?;
    Ok((name.trim().to_owned(), value))
}

fn load_config(args: &Args) -> anyhow::Result<RankConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => RankConfig::default(),
    };
    for (feature, weight) in &args.weights {
        config.weights.insert(feature.clone(), *weight)?;
    }
    if let (Some(lo), Some(hi)) = (args.lo, args.hi) {
        config.interval = Interval::new(lo, hi)?;
    }
    Ok(config)
}

fn read_table<Input: BufRead>(input: Input) -> anyhow::Result<FeatureTable> {
    let mut lines = input.lines();
    let header = lines.next().context("missing header line")??;
    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_owned()).collect();
    let mut seen = BTreeSet::new();
    if let Some(column) = columns.iter().find(|c| !seen.insert(c.as_str())) {
        bail!("duplicate column {column:?} in header");
    }

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let line = line?;
        let line_number = index + 2;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != columns.len() {
            bail!(
                "line {line_number}: expected {} fields, got {}",
                columns.len(),
                fields.len()
            );
        }
        let mut row = Row::new();
        for (column, field) in columns.iter().zip(fields) {
            let value = field.trim().parse::<f64>().with_context(|| {
                format!("line {line_number}: {column} is not a number: {field:?}")
            })?;
            row.insert(column.as_str(), value);
        }
        rows.push(row);
    }
    Ok(FeatureTable::new(rows)?)
}
