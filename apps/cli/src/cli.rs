//! Command-line arguments.

use clap::{Parser, Subcommand};
use study_core::types::{DisplayFilter, Order};

#[derive(Debug, Parser)]
#[command(name = "vocab-cards", version, about = "Study vocabulary cards by unit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Study the words of a unit.
    Study {
        /// Unit id, as listed by `units`.
        unit_id: i64,
    },
    /// List the units available to study.
    Units,
    /// Show or change the card filter and order.
    Settings {
        /// all, remembered or not_remembered
        #[arg(long, value_parser = parse_filter)]
        filter: Option<DisplayFilter>,
        /// sequential or random
        #[arg(long, value_parser = parse_order)]
        order: Option<Order>,
    },
    /// Show or clear remembered / not remembered history.
    History {
        #[arg(long)]
        clear: bool,
    },
}

fn parse_filter(s: &str) -> Result<DisplayFilter, String> {
    DisplayFilter::from_str(s).ok_or_else(|| format!("unknown filter '{s}'"))
}

fn parse_order(s: &str) -> Result<Order, String> {
    Order::from_str(s).ok_or_else(|| format!("unknown order '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_study_command() {
        let cli = Cli::try_parse_from(["vocab-cards", "study", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Study { unit_id: 3 }));
    }

    #[test]
    fn parses_settings_values() {
        let cli = Cli::try_parse_from([
            "vocab-cards",
            "settings",
            "--filter",
            "remembered",
            "--order",
            "random",
        ])
        .unwrap();
        match cli.command {
            Command::Settings { filter, order } => {
                assert_eq!(filter, Some(DisplayFilter::Remembered));
                assert_eq!(order, Some(Order::Random));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["vocab-cards", "settings", "--filter", "some"]).is_err());
    }
}
