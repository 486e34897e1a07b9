// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `cmdserver`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cmdserver",
    version,
    about = "Serve the output of a command over HTTP, re-running it on every request.",
    long_about = None
)]
pub struct CliArgs {
    /// Address to listen on.
    #[arg(long, value_name = "HOST:PORT", default_value = "localhost:8080")]
    pub addr: String,

    /// Reload page every N seconds (0 disables the Refresh header).
    #[arg(short = 'r', long = "reload", value_name = "SECONDS", default_value_t = 0)]
    pub reload: u32,

    /// Per-request deadline covering both the wait for the command slot and
    /// the command run itself.
    #[arg(long, value_name = "SECONDS", default_value_t = 5)]
    pub timeout: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CMDSERVER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to run on every request, followed by its arguments.
    ///
    /// Everything from the first positional argument on belongs to the
    /// command, so `tail -n 20 app.log` needs no `--`. A leading unknown
    /// flag is a parse error rather than the program name.
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = CliArgs::try_parse_from(["cmdserver", "date"]).unwrap();
        assert_eq!(args.addr, "localhost:8080");
        assert_eq!(args.reload, 0);
        assert_eq!(args.timeout, 5);
        assert_eq!(args.command, vec!["date".to_string()]);
    }

    #[test]
    fn command_arguments_may_look_like_flags() {
        let args =
            CliArgs::try_parse_from(["cmdserver", "-r", "3", "tail", "-n", "20", "app.log"])
                .unwrap();
        assert_eq!(args.reload, 3);
        assert_eq!(args.command, vec!["tail", "-n", "20", "app.log"]);
    }

    #[test]
    fn single_dash_long_flag_is_rejected() {
        let err = CliArgs::try_parse_from([
            "cmdserver",
            "-addr",
            "127.0.0.1:9000",
            "tail",
            "app.log",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn unknown_flag_before_command_is_rejected() {
        let err = CliArgs::try_parse_from(["cmdserver", "--bogus", "tail"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn flags_after_command_belong_to_command() {
        let args =
            CliArgs::try_parse_from(["cmdserver", "tail", "--addr", "x", "-r", "1"]).unwrap();
        assert_eq!(args.addr, "localhost:8080");
        assert_eq!(args.reload, 0);
        assert_eq!(args.command, vec!["tail", "--addr", "x", "-r", "1"]);
    }

    #[test]
    fn missing_command_parses_to_empty_list() {
        let args = CliArgs::try_parse_from(["cmdserver", "--addr", "0.0.0.0:9000"]).unwrap();
        assert_eq!(args.addr, "0.0.0.0:9000");
        assert!(args.command.is_empty());
    }
}
