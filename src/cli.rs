use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::models::Layout;

#[derive(Parser, Debug)]
#[clap(
    name = "flipbook",
    version,
    about = "Read a collection of plain-text poems as a flip-book in the terminal.",
    long_about = None
)]
pub struct Cli {
    /// Fetch poems from <URL>/poems/<file> instead of a local directory
    #[clap(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Directory holding the poem files
    #[clap(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Page layout: auto, single or spread
    #[clap(short, long, value_name = "LAYOUT")]
    pub layout: Option<Layout>,

    /// Print the paginated book instead of opening the reader
    #[clap(long)]
    pub dump: bool,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,

    /// Poem files to read, in order (overrides the configured list)
    #[clap(name = "POEM")]
    pub poems: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from([
            "flipbook",
            "--layout",
            "spread",
            "--dir",
            "verses",
            "-vv",
            "A.txt",
            "B.txt",
        ]);
        assert_eq!(cli.layout, Some(Layout::Spread));
        assert_eq!(cli.dir, Some(PathBuf::from("verses")));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.poems, vec!["A.txt", "B.txt"]);
        assert!(!cli.dump);
    }

    #[test]
    fn test_rejects_unknown_layout() {
        assert!(Cli::try_parse_from(["flipbook", "--layout", "sideways"]).is_err());
    }
}
