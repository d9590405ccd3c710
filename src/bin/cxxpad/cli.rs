//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// cxxpad - compile and run single-file C++ programs against Conan dependencies
#[derive(Parser)]
#[command(name = "cxxpad")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, env = "CXXPAD_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the project directories and the start file
    Init,

    /// Show the compiler flags resolved from the dependency manifest
    Flags(FlagsArgs),

    /// Compile a source file
    Build(BuildArgs),

    /// Launch the last built executable
    Run,

    /// Inspect or reset the saved editor session
    Session(SessionArgs),

    /// Check the project and toolchain
    Doctor,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Also list the runtime search directories
    #[arg(long)]
    pub bin_dirs: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Source file to compile (defaults to the session's active file)
    pub file: Option<PathBuf>,

    /// Launch the program after a successful build
    #[arg(long)]
    pub run: bool,

    /// Output format for build progress
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommands,
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Print the saved session
    Show,

    /// Delete the saved session
    Clear,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_defaults() {
        let cli = parse(&["cxxpad", "build"]);
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert!(args.file.is_none());
        assert!(!args.run);
        assert_eq!(args.message_format, MessageFormat::Human);
    }

    #[test]
    fn test_build_with_options() {
        let cli = parse(&[
            "cxxpad",
            "build",
            "saves/main.cpp",
            "--run",
            "--message-format",
            "json",
        ]);
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.file, Some(PathBuf::from("saves/main.cpp")));
        assert!(args.run);
        assert_eq!(args.message_format, MessageFormat::Json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["cxxpad", "flags", "--root", "/tmp/p", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/p")));
    }

    #[test]
    fn test_session_subcommands() {
        let cli = parse(&["cxxpad", "session", "clear"]);
        assert!(matches!(
            cli.command,
            Commands::Session(SessionArgs {
                command: SessionCommands::Clear
            })
        ));
    }

    #[test]
    fn test_unknown_message_format_rejected() {
        assert!(Cli::try_parse_from(["cxxpad", "build", "--message-format", "xml"]).is_err());
    }
}
