use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fipack")]
#[command(version)]
#[command(about = "fipack: a tool for packaging multiple assets together in one file", long_about = None)]
#[command(after_help = "Examples:\n  \
  fipack -o game.fas assets shaders/main.glsl   pack a directory and a file\n  \
  fipack -i game.fas                            show the contents of game.fas\n  \
  fipack -e out game.fas                        extract every member below out/")]
pub struct Cli {
    /// Files or directories to pack, or archives to extract with -e
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Output packed archive filename
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Extract all packed files of the input archives to DIR
    #[arg(short = 'e', long, value_name = "DIR", conflicts_with = "info")]
    pub extract: Option<PathBuf>,

    /// Display contents info of a packed archive
    #[arg(short = 'i', long, value_name = "ARCHIVE")]
    pub info: Option<PathBuf>,

    /// Print the info listing as JSON
    #[arg(long, requires = "info")]
    pub json: bool,

    /// Pack definition in TOML
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fail instead of skipping inputs that cannot be read
    #[arg(long)]
    pub strict: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Nothing requested at all; any mode flag counts as a request
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
            && self.info.is_none()
            && self.extract.is_none()
            && self.config.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pack_arguments() {
        let cli = Cli::parse_from(["fipack", "-o", "out.fas", "assets", "a.txt", "-vv"]);
        assert_eq!(cli.output, Some(PathBuf::from("out.fas")));
        assert_eq!(cli.inputs, vec![PathBuf::from("assets"), PathBuf::from("a.txt")]);
        assert_eq!(cli.log_filter(), "debug");
        assert!(!cli.is_empty());
    }

    #[test]
    fn test_extract_without_archive_is_not_empty() {
        let cli = Cli::parse_from(["fipack", "-e", "out"]);
        assert!(cli.inputs.is_empty());
        assert!(!cli.is_empty());

        assert!(Cli::parse_from(["fipack"]).is_empty());
    }

    #[test]
    fn test_info_and_extract_conflict() {
        let result = Cli::try_parse_from(["fipack", "-i", "a.fas", "-e", "out"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_requires_info() {
        assert!(Cli::try_parse_from(["fipack", "--json", "a.txt"]).is_err());
        let cli = Cli::parse_from(["fipack", "-i", "a.fas", "--json"]);
        assert!(cli.json);
    }
}
