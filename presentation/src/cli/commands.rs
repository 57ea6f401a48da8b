//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for school-tutor
#[derive(Parser, Debug)]
#[command(name = "school-tutor")]
#[command(author, version, about = "School tutor - answers student questions with optional live web grounding")]
#[command(long_about = r#"
School tutor answers questions from students and teachers over web and
messaging channels. Questions about recent events are grounded with live
data, either through a provider-side online model or through web_search /
wikipedia_search tool calls.

Configuration files are loaded from (in priority order):
1. TUTOR_* environment variables (TUTOR_SERVER__PORT=9000)
2. --config <path>     Explicit config file
3. ./tutor.toml        Project-level config
4. ~/.config/school-tutor/config.toml   Global config

Example:
  school-tutor serve --port 8080
  school-tutor ask "Quem ganhou as eleições de 2025?" --platform whatsapp
  school-tutor ask "Explica a fotossíntese" -m openai/gpt-4o-mini
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Answer one question and print the JSON response
    Ask {
        /// The question to answer
        question: String,

        /// Model id from the catalog
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Channel the answer is formatted for (web, whatsapp, discord)
        #[arg(long, default_value = "web")]
        platform: String,

        /// School whose context seeds the prompt
        #[arg(long, value_name = "ID")]
        school_id: Option<String>,

        /// Caller identifier
        #[arg(long, default_value = "cli")]
        phone: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["school-tutor", "-vv", "serve", "--port", "9000"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Some(Command::Serve {
                host: None,
                port: Some(9000)
            })
        );
    }

    #[test]
    fn test_parse_ask_defaults() {
        let cli = Cli::parse_from(["school-tutor", "ask", "Quanto é 2+2?", "--no-config"]);
        assert!(cli.no_config);
        match cli.command {
            Some(Command::Ask {
                question,
                model,
                platform,
                phone,
                ..
            }) => {
                assert_eq!(question, "Quanto é 2+2?");
                assert!(model.is_none());
                assert_eq!(platform, "web");
                assert_eq!(phone, "cli");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_show_config_without_command() {
        let cli = Cli::parse_from(["school-tutor", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }
}
