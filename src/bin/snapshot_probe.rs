use anyhow::{bail, Context, Result};

use breakout_dashboard::cache::SnapshotCache;
use breakout_dashboard::coingecko::CoinGeckoRestClient;
use breakout_dashboard::config::Config;
use breakout_dashboard::model::signal::Column;
use breakout_dashboard::refresh::{run_cycle, Trigger};

const DEFAULT_TOP: usize = 15;

#[derive(Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug)]
struct ProbeArgs {
    format: OutputFormat,
    top: usize,
}

fn parse_args(args: &[String]) -> Result<ProbeArgs> {
    let mut parsed = ProbeArgs {
        format: OutputFormat::Table,
        top: DEFAULT_TOP,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => parsed.format = OutputFormat::Json,
            "--top" => {
                let value = iter.next().context("--top needs a value")?;
                parsed.top = value
                    .parse()
                    .with_context(|| format!("invalid --top value '{}'", value))?;
            }
            other => bail!("unknown argument '{}' (expected --json or --top N)", other),
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;
    let config = Config::load()?;

    let client = CoinGeckoRestClient::new(&config.coingecko)?;
    let mut cache = SnapshotCache::new(config.refresh.cache_ttl());
    let report = run_cycle(&client, &mut cache, Trigger::Manual, std::time::Instant::now())
        .await
        .context("snapshot probe failed")?;

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report.table.as_ref())?);
        return Ok(());
    }

    println!(
        "snapshot {} | {} assets | {} high",
        report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.table.len(),
        report.table.high_signal_count()
    );
    println!(
        "{:<8} {:>9} {:>9} {:>8} {:>8} {:>9} {:>7}",
        "ticker", "1d%", "1w%", "price_z", "vol_z", "composite", "signal"
    );
    for ranked in report
        .table
        .ranking(Column::CompositeForecast, args.top)
        .iter()
        .rev()
    {
        let Some(row) = report.table.get(&ranked.ticker) else {
            continue;
        };
        println!(
            "{:<8} {:>9.2} {:>9.2} {:>8.2} {:>8.2} {:>9.2} {:>7}",
            row.ticker(),
            row.asset.price_change_1d_pct,
            row.asset.price_change_1w_pct,
            row.metrics.price_zscore_1d,
            row.metrics.volume_zscore_1d,
            row.metrics.composite_forecast,
            row.metrics.signal_class.as_str(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_table_output() {
        let parsed = parse_args(&[]).unwrap();
        assert_eq!(parsed.format, OutputFormat::Table);
        assert_eq!(parsed.top, DEFAULT_TOP);
    }

    #[test]
    fn accepts_json_and_top() {
        let parsed = parse_args(&args(&["--json", "--top", "5"])).unwrap();
        assert_eq!(parsed.format, OutputFormat::Json);
        assert_eq!(parsed.top, 5);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(parse_args(&args(&["--csv"])).is_err());
        assert!(parse_args(&args(&["--top"])).is_err());
        assert!(parse_args(&args(&["--top", "many"])).is_err());
    }
}
