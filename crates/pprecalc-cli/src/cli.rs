//! CLI argument definitions for pprecalc.

use std::path::PathBuf;

use clap::Parser;
use pprecalc::config::MAX_WORKERS;
use pprecalc::{GameMode, RankedStatus, Ruleset, SelectionVariant};

#[derive(Parser, Debug)]
#[command(name = "pprecalc")]
#[command(about = "Recalculate pp for submitted scores", version)]
pub struct Args {
    /// Game mode (0 = std, 1 = taiko)
    #[arg(short, long, default_value = "0", value_parser = parse_gamemode)]
    pub gamemode: GameMode,

    /// Score table (0 = vanilla, 1 = relax)
    #[arg(short, long, default_value = "1", value_parser = parse_ruleset)]
    pub relax: Ruleset,

    /// Ranked status (2 = ranked, 5 = loved, 0 = any eligible)
    #[arg(short = 's', long, default_value_t = 0, value_parser = parse_ranked)]
    pub ranked: u8,

    /// Maximum number of scores (0 = no limit)
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Only recalculate scores on this beatmap (0 = all)
    #[arg(short, long)]
    pub beatmap: Option<u32>,

    /// Number of scores processed concurrently
    #[arg(short, long, value_parser = parse_threads)]
    pub threads: Option<usize>,

    /// Selection variant (map or status)
    #[arg(long, default_value = "map")]
    pub variant: SelectionVariant,

    /// Config file (defaults to ./config.toml, then the user config dir)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Database URL, overrides the config file
    #[arg(long, env = "PPRECALC_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn ranked_status(&self) -> Option<RankedStatus> {
        RankedStatus::from_u8(self.ranked)
    }
}

fn parse_gamemode(s: &str) -> Result<GameMode, String> {
    s.parse::<u8>()
        .ok()
        .and_then(GameMode::from_u8)
        .ok_or_else(|| format!("invalid gamemode '{}' (expected 0 or 1)", s))
}

fn parse_ruleset(s: &str) -> Result<Ruleset, String> {
    s.parse::<u8>()
        .ok()
        .and_then(Ruleset::from_u8)
        .ok_or_else(|| format!("invalid relax value '{}' (expected 0 or 1)", s))
}

fn parse_ranked(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(0) => Ok(0),
        Ok(code) if RankedStatus::from_u8(code).is_some() => Ok(code),
        _ => Err(format!("invalid ranked status '{}' (expected 2 or 5)", s)),
    }
}

fn parse_threads(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if (1..=MAX_WORKERS).contains(&n) => Ok(n),
        _ => Err(format!(
            "invalid thread count '{}' (expected 1 to {})",
            s, MAX_WORKERS
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("pprecalc").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.gamemode, GameMode::Std);
        assert_eq!(args.relax, Ruleset::Relax);
        assert_eq!(args.ranked_status(), None);
        assert_eq!(args.limit, None);
        assert_eq!(args.beatmap, None);
        assert_eq!(args.threads, None);
        assert_eq!(args.variant, SelectionVariant::Map);
        assert!(!args.json);
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["-g", "1", "-r", "0", "-s", "5", "-l", "100", "-b", "75", "-t", "4"])
            .unwrap();
        assert_eq!(args.gamemode, GameMode::Taiko);
        assert_eq!(args.relax, Ruleset::Vanilla);
        assert_eq!(args.ranked_status(), Some(RankedStatus::Loved));
        assert_eq!(args.limit, Some(100));
        assert_eq!(args.beatmap, Some(75));
        assert_eq!(args.threads, Some(4));
    }

    #[test]
    fn test_status_variant() {
        let args = parse(&["--variant", "status", "-s", "2"]).unwrap();
        assert_eq!(args.variant, SelectionVariant::Status);
        assert_eq!(args.ranked_status(), Some(RankedStatus::Ranked));
    }

    #[test]
    fn test_rejects_unknown_codes() {
        assert!(parse(&["-g", "2"]).is_err());
        assert!(parse(&["-r", "3"]).is_err());
        assert!(parse(&["-s", "3"]).is_err());
        assert!(parse(&["-t", "0"]).is_err());
        assert!(parse(&["--variant", "beatmap"]).is_err());
    }

    #[test]
    fn test_thread_count_bounds() {
        let max = MAX_WORKERS.to_string();
        assert_eq!(parse(&["-t", &max]).unwrap().threads, Some(MAX_WORKERS));

        let over = (MAX_WORKERS + 1).to_string();
        assert!(parse(&["-t", &over]).is_err());
        assert!(parse(&["-t", "18446744073709551615"]).is_err());
    }
}
