use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_OUTPUT_DIR: &str = "output/images";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";

#[derive(Parser, Debug)]
#[command(name = "dataviz-mcpd", version, about = "Data visualization MCP daemon.")]
struct CliArgs {
    /// Directory holding the CSV datasets.
    #[arg(long, env = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: String,

    /// Directory rendered charts are written to. Created if missing.
    #[arg(long, env = "OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: String,

    #[arg(
        long = "stdio",
        env = "DATAVIZ_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long,
        env = "DATAVIZ_MCP_SERVE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "DATAVIZ_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    /// Verify the directories and datasets, print a report, and exit.
    #[arg(
        long,
        env = "DATAVIZ_CHECK",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    check: bool,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct DataVizConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
    pub check: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl DataVizConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

fn directory(name: &'static str, value: String) -> Result<PathBuf, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidSetting { name, value });
    }
    Ok(PathBuf::from(value))
}

impl TryFrom<CliArgs> for DataVizConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let data_dir = directory("DATA_DIR", args.data_dir)?;
        let output_dir = directory("OUTPUT_DIR", args.output_dir)?;

        if !args.check && !args.enable_stdio && !args.mcp_serve {
            return Err(ConfigError::MissingSetting(
                "DATAVIZ_ENABLE_STDIO or DATAVIZ_MCP_SERVE",
            ));
        }

        Ok(Self {
            data_dir,
            output_dir,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
            check: args.check,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            enable_stdio: true,
            mcp_serve: false,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            check: false,
        }
    }

    #[test]
    fn defaults_serve_stdio_from_relative_directories() {
        let config = DataVizConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.output_dir, PathBuf::from("output/images"));
        assert!(config.enable_stdio);
        assert!(!config.mcp_serve);
    }

    #[test]
    fn cli_flags_parse_with_boolish_values() {
        let args = CliArgs::try_parse_from([
            "dataviz-mcpd",
            "--data-dir",
            "/srv/data",
            "--stdio",
            "no",
            "--mcp-serve",
            "yes",
        ])
        .expect("flags should parse");
        let config = DataVizConfig::try_from(args).expect("config should parse");

        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert!(!config.enable_stdio);
        assert!(config.mcp_serve);
    }

    #[test]
    fn blank_directory_is_rejected() {
        let mut args = base_args();
        args.output_dir = "  ".to_string();

        let err = DataVizConfig::try_from(args).expect_err("blank dir should fail");
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                name: "OUTPUT_DIR",
                ..
            }
        ));
    }

    #[test]
    fn some_transport_is_required_unless_checking() {
        let mut args = base_args();
        args.enable_stdio = false;
        assert!(matches!(
            DataVizConfig::try_from(args),
            Err(ConfigError::MissingSetting(_))
        ));

        let mut args = base_args();
        args.enable_stdio = false;
        args.check = true;
        assert!(DataVizConfig::try_from(args).is_ok());
    }
}
