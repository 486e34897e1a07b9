// src/config/validate.rs

use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::{AppConfig, CommandSpec, ServerConfig};
use crate::errors::{CmdServerError, Result};

impl CommandSpec {
    /// Build a command spec from `[program, args...]`.
    ///
    /// Fails if the list is empty or the program name is blank.
    pub fn new(cmdargs: Vec<String>) -> Result<Self> {
        let mut iter = cmdargs.into_iter();
        let program = iter.next().ok_or_else(|| {
            CmdServerError::ConfigError("need command and its arguments to call".to_string())
        })?;

        if program.trim().is_empty() {
            return Err(CmdServerError::ConfigError(
                "command name must not be empty".to_string(),
            ));
        }

        Ok(CommandSpec::new_unchecked(program, iter.collect()))
    }
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = CmdServerError;

    fn try_from(args: CliArgs) -> std::result::Result<Self, Self::Error> {
        let command = CommandSpec::new(args.command)?;
        let server = validate_server(args.addr, args.reload, args.timeout)?;
        Ok(AppConfig { server, command })
    }
}

fn validate_server(addr: String, reload: u32, timeout_secs: u64) -> Result<ServerConfig> {
    if addr.trim().is_empty() {
        return Err(CmdServerError::ConfigError(
            "--addr must not be empty".to_string(),
        ));
    }

    if timeout_secs == 0 {
        return Err(CmdServerError::ConfigError(
            "--timeout must be >= 1 second (got 0)".to_string(),
        ));
    }

    Ok(ServerConfig {
        addr,
        reload,
        request_timeout: Duration::from_secs(timeout_secs),
        read_timeout: ServerConfig::DEFAULT_READ_TIMEOUT,
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn empty_command_is_rejected() {
        let err = AppConfig::try_from(parse(&["cmdserver"])).unwrap_err();
        match err {
            CmdServerError::ConfigError(msg) => {
                assert_eq!(msg, "need command and its arguments to call")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_program_is_rejected() {
        let err = CommandSpec::new(vec!["  ".to_string()]).unwrap_err();
        assert!(matches!(err, CmdServerError::ConfigError(_)));
    }

    #[test]
    fn program_and_args_are_split() {
        let spec = CommandSpec::new(vec!["tail".into(), "-n".into(), "5".into()]).unwrap();
        assert_eq!(spec.program(), "tail");
        assert_eq!(spec.args(), ["-n", "5"]);
        assert_eq!(spec.to_string(), "tail -n 5");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = AppConfig::try_from(parse(&["cmdserver", "--timeout", "0", "date"])).unwrap_err();
        assert!(err.to_string().contains("--timeout"));
    }

    #[test]
    fn cli_values_flow_into_server_config() {
        let cfg = AppConfig::try_from(parse(&[
            "cmdserver", "--addr", "127.0.0.1:0", "-r", "5", "--timeout", "9", "uptime",
        ]))
        .unwrap();
        assert_eq!(cfg.server.addr, "127.0.0.1:0");
        assert_eq!(cfg.server.reload, 5);
        assert_eq!(cfg.server.request_timeout, Duration::from_secs(9));
        assert_eq!(cfg.server.read_timeout, Duration::from_secs(1));
        assert_eq!(cfg.command.program(), "uptime");
        assert!(cfg.command.args().is_empty());
    }
}
