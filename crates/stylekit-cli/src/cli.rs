use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// StyleKit: sanitize custom CSS and manage design tokens, revisions, and presets.
#[derive(Parser, Debug)]
#[command(name = "stylekit", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Option store path override.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sanitize a stylesheet and print the result. Reads stdin without FILE.
    Sanitize { file: Option<PathBuf> },

    /// Print the specificity of a selector list.
    Specificity { selector: String },

    /// Save the active stylesheet from desktop, tablet, and mobile segments.
    Css {
        /// Desktop segment. Reads stdin without FILE.
        file: Option<PathBuf>,
        /// Tablet segment; the stored one is kept when omitted.
        #[arg(long)]
        tablet: Option<PathBuf>,
        /// Mobile segment; the stored one is kept when omitted.
        #[arg(long)]
        mobile: Option<PathBuf>,
        /// Append to the stored desktop segment.
        #[arg(long)]
        append: bool,
    },

    /// Design token registry.
    Tokens {
        #[command(subcommand)]
        action: TokensCommand,
    },

    /// CSS revision history.
    Revisions {
        #[command(subcommand)]
        action: RevisionsCommand,
    },

    /// Style presets.
    Presets {
        #[command(subcommand)]
        action: PresetsCommand,
    },

    /// Configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokensCommand {
    /// List tokens.
    List {
        /// Print the registry as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Replace the registry with a JSON array of tokens.
    Save { file: Option<PathBuf> },
    /// Import tokens from CSS, keeping metadata of existing tokens.
    Import { file: Option<PathBuf> },
    /// Print the generated token stylesheet.
    Export,
    /// Update governance metadata on one token.
    Meta {
        name: String,
        #[arg(long, default_value = ":root")]
        context: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        owner: Option<u64>,
        /// Semantic version of the token.
        #[arg(long = "token-version")]
        token_version: Option<String>,
        #[arg(long)]
        changelog: Option<String>,
        /// Comma-separated component names.
        #[arg(long)]
        components: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RevisionsCommand {
    /// List revisions, newest first.
    List {
        /// Only revisions of this option (`tokens`, `css`, or a full option name).
        #[arg(long)]
        option: Option<String>,
    },
    /// Print one revision as JSON.
    Show { id: String },
    /// Restore a revision.
    Restore { id: String },
}

#[derive(Subcommand, Debug)]
pub enum PresetsCommand {
    /// List presets as JSON.
    List {
        /// List avatar glow presets instead.
        #[arg(long)]
        glow: bool,
    },
    /// Merge presets from a YAML file.
    Import { file: PathBuf },
    /// Delete a preset.
    Delete {
        id: String,
        #[arg(long)]
        glow: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as JSON.
    Show,
    /// Write the effective configuration to the config path.
    Init,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "stylekit",
            "tokens",
            "list",
            "--json",
            "--store",
            "/tmp/options.json",
        ])
        .unwrap();
        assert_eq!(args.store, Some(PathBuf::from("/tmp/options.json")));
        assert!(matches!(
            args.command,
            Command::Tokens {
                action: TokensCommand::List { json: true }
            }
        ));
    }

    #[test]
    fn meta_context_defaults_to_root() {
        let args = Args::try_parse_from([
            "stylekit", "tokens", "meta", "--status", "ready", "--", "--brand",
        ])
        .unwrap();
        match args.command {
            Command::Tokens {
                action:
                    TokensCommand::Meta {
                        name,
                        context,
                        status,
                        ..
                    },
            } => {
                assert_eq!(name, "--brand");
                assert_eq!(context, ":root");
                assert_eq!(status.as_deref(), Some("ready"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn css_segments() {
        let args = Args::try_parse_from([
            "stylekit", "css", "desktop.css", "--tablet", "tablet.css", "--append",
        ])
        .unwrap();
        match args.command {
            Command::Css {
                file,
                tablet,
                mobile,
                append,
            } => {
                assert_eq!(file, Some(PathBuf::from("desktop.css")));
                assert_eq!(tablet, Some(PathBuf::from("tablet.css")));
                assert!(mobile.is_none());
                assert!(append);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Args::try_parse_from(["stylekit"]).is_err());
    }
}
