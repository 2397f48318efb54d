//! Subcommand handlers. Each writes its result to `out`.

use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use stylekit_common::StyleKitError;
use stylekit_config::StyleKitConfig;
use stylekit_sanitizer::{sanitize, specificity};
use stylekit_tokens::{
    keys, tokens_to_css, ActiveCssRequest, MetadataPatch, RawToken, RestoreOutcome,
    RevisionContext, SaveOutcome, StyleService,
};

use crate::cli::{Command, ConfigCommand, PresetsCommand, RevisionsCommand, TokensCommand};

/// Read a file, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String, StyleKitError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<(), StyleKitError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| StyleKitError::Other(e.to_string()))?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn report_save(out: &mut dyn Write, outcome: &SaveOutcome) -> Result<(), StyleKitError> {
    if outcome.is_saved() {
        writeln!(out, "saved {} tokens", outcome.tokens.len())?;
        return Ok(());
    }
    for group in &outcome.duplicates {
        warn!(key = %group.key, variants = ?group.variants, "duplicate token");
    }
    write_json(out, &outcome.duplicates)?;
    Err(StyleKitError::Other(format!(
        "{} duplicate token group(s); nothing saved",
        outcome.duplicates.len()
    )))
}

/// Everything a handler needs besides its arguments.
pub struct Runner<'a> {
    pub service: &'a StyleService,
    pub config: &'a StyleKitConfig,
    pub config_path: Option<&'a Path>,
}

impl Runner<'_> {
    pub fn run(&self, command: Command, out: &mut dyn Write) -> Result<(), StyleKitError> {
        let ctx = RevisionContext::default();
        match command {
            Command::Sanitize { file } => {
                let css = read_input(file.as_deref())?;
                writeln!(out, "{}", sanitize(&css))?;
            }
            Command::Specificity { selector } => {
                writeln!(out, "{}", specificity(&selector))?;
            }
            Command::Css {
                file,
                tablet,
                mobile,
                append,
            } => {
                let request = ActiveCssRequest {
                    css: read_input(file.as_deref())?,
                    tablet: tablet.as_deref().map(|p| read_input(Some(p))).transpose()?,
                    mobile: mobile.as_deref().map(|p| read_input(Some(p))).transpose()?,
                    append,
                };
                let compiled = self.service.save_active_css(&request, &ctx)?;
                writeln!(out, "{compiled}")?;
            }
            Command::Tokens { action } => self.tokens(action, &ctx, out)?,
            Command::Revisions { action } => self.revisions(action, out)?,
            Command::Presets { action } => self.presets(action, out)?,
            Command::Config { action } => self.config(action, out)?,
        }
        Ok(())
    }

    fn tokens(
        &self,
        action: TokensCommand,
        ctx: &RevisionContext,
        out: &mut dyn Write,
    ) -> Result<(), StyleKitError> {
        let registry = self.service.tokens();
        match action {
            TokensCommand::List { json } => {
                let tokens = registry.get_registry();
                if json {
                    write_json(out, &tokens)?;
                } else {
                    for token in &tokens {
                        writeln!(
                            out,
                            "{} {}: {} [{}, {}]",
                            token.context,
                            token.name,
                            token.value,
                            token.token_type.as_str(),
                            token.status.as_str()
                        )?;
                    }
                }
            }
            TokensCommand::Save { file } => {
                let text = read_input(file.as_deref())?;
                let raw: Vec<RawToken> = serde_json::from_str(&text)
                    .map_err(|e| StyleKitError::Other(format!("invalid token JSON: {e}")))?;
                let outcome = self.service.save_tokens(&raw, ctx)?;
                report_save(out, &outcome)?;
            }
            TokensCommand::Import { file } => {
                let css = read_input(file.as_deref())?;
                let outcome = self.service.import_tokens_css(&css, ctx)?;
                report_save(out, &outcome)?;
            }
            TokensCommand::Export => {
                writeln!(out, "{}", tokens_to_css(&registry.get_registry()))?;
            }
            TokensCommand::Meta {
                name,
                context,
                status,
                owner,
                token_version,
                changelog,
                components,
            } => {
                let patch = MetadataPatch {
                    status,
                    owner: owner.map(Value::from),
                    version: token_version,
                    changelog,
                    linked_components: components.map(Value::String),
                };
                match registry.update_token_metadata(&name, &context, &patch)? {
                    Some(token) => write_json(out, &token)?,
                    None => {
                        return Err(StyleKitError::Other(format!(
                            "no token {name} in {context}"
                        )))
                    }
                }
            }
        }
        Ok(())
    }

    fn revisions(&self, action: RevisionsCommand, out: &mut dyn Write) -> Result<(), StyleKitError> {
        let revisions = self.service.revisions();
        match action {
            RevisionsCommand::List { option } => {
                for revision in revisions.list(option.as_deref().map(resolve_option)) {
                    writeln!(
                        out,
                        "{}  {}  {}  {}",
                        revision.id, revision.timestamp, revision.option, revision.author
                    )?;
                }
            }
            RevisionsCommand::Show { id } => match revisions.get(&id) {
                Some(revision) => write_json(out, &revision)?,
                None => return Err(StyleKitError::Other(format!("no revision {id}"))),
            },
            RevisionsCommand::Restore { id } => match revisions.restore(&id)? {
                Some(RestoreOutcome::Restored(revision)) => {
                    info!(id = %revision.id, option = %revision.option, "revision restored");
                    writeln!(out, "restored {} ({})", revision.id, revision.option)?;
                }
                Some(RestoreOutcome::Conflict(conflict)) => {
                    write_json(out, &conflict)?;
                    return Err(StyleKitError::Other(conflict.error));
                }
                None => return Err(StyleKitError::Other(format!("no revision {id}"))),
            },
        }
        Ok(())
    }

    fn presets(&self, action: PresetsCommand, out: &mut dyn Write) -> Result<(), StyleKitError> {
        let library = self.service.presets();
        match action {
            PresetsCommand::List { glow: false } => write_json(out, &library.presets())?,
            PresetsCommand::List { glow: true } => {
                write_json(out, &library.avatar_glow_presets())?
            }
            PresetsCommand::Import { file } => {
                let text = read_input(Some(file.as_path()))?;
                let presets = library.import_yaml(&text)?;
                writeln!(out, "{} presets stored", presets.len())?;
            }
            PresetsCommand::Delete { id, glow } => {
                let removed = if glow {
                    library.delete_avatar_glow_preset(&id)?
                } else {
                    library.delete_preset(&id)?
                };
                if !removed {
                    return Err(StyleKitError::Other(format!("no preset {id}")));
                }
                writeln!(out, "deleted {id}")?;
            }
        }
        Ok(())
    }

    fn config(&self, action: ConfigCommand, out: &mut dyn Write) -> Result<(), StyleKitError> {
        match action {
            ConfigCommand::Show => writeln!(out, "{}", stylekit_config::config_to_json(self.config))?,
            ConfigCommand::Init => {
                match self.config_path {
                    Some(path) => stylekit_config::save_config_to_path(self.config, path)?,
                    None => stylekit_config::save_config(self.config)?,
                }
                writeln!(out, "config written")?;
            }
        }
        Ok(())
    }
}

/// Name of the stored option a revision list filter refers to, accepting
/// the short aliases `tokens` and `css`.
pub fn resolve_option(name: &str) -> &str {
    match name {
        "tokens" => keys::TOKENS_CSS,
        "css" | "active" => keys::ACTIVE_CSS,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use stylekit_common::{JsonFileStore, MemoryStore, OptionStore};

    fn run(service: &StyleService, command: Command) -> (Result<(), StyleKitError>, String) {
        let config = StyleKitConfig::default();
        let runner = Runner {
            service,
            config: &config,
            config_path: None,
        };
        let mut out = Vec::new();
        let result = runner.run(command, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn memory_service() -> (Arc<MemoryStore>, StyleService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), StyleService::new(store))
    }

    #[test]
    fn sanitize_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.css");
        std::fs::write(&path, "<b>.a{color:red}</b>").unwrap();

        let (_store, service) = memory_service();
        let (result, out) = run(&service, Command::Sanitize { file: Some(path) });
        result.unwrap();
        assert_eq!(out, ".a{color:red}\n");
    }

    #[test]
    fn specificity_prints_triple() {
        let (_store, service) = memory_service();
        let (result, out) = run(
            &service,
            Command::Specificity {
                selector: "#a .b p".into(),
            },
        );
        result.unwrap();
        assert_eq!(out, "1,1,1\n");
    }

    #[test]
    fn import_then_list_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.css");
        std::fs::write(&path, ":root { --brand: #123456; }").unwrap();

        let (_store, service) = memory_service();
        let (result, out) = run(
            &service,
            Command::Tokens {
                action: TokensCommand::Import { file: Some(path) },
            },
        );
        result.unwrap();
        assert_eq!(out, "saved 1 tokens\n");

        let (result, out) = run(
            &service,
            Command::Tokens {
                action: TokensCommand::List { json: false },
            },
        );
        result.unwrap();
        assert_eq!(out, ":root --brand: #123456 [color, draft]\n");
    }

    #[test]
    fn duplicate_import_fails_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.css");
        std::fs::write(&path, ":root { --a: 1; --A: 2; }").unwrap();

        let (store, service) = memory_service();
        let (result, out) = run(
            &service,
            Command::Tokens {
                action: TokensCommand::Import { file: Some(path) },
            },
        );
        assert!(result.is_err());
        assert!(out.contains("\"variants\""));
        assert!(store.get(keys::TOKENS_REGISTRY).is_none());
    }

    #[test]
    fn meta_for_unknown_token_is_an_error() {
        let (_store, service) = memory_service();
        let (result, _out) = run(
            &service,
            Command::Tokens {
                action: TokensCommand::Meta {
                    name: "--nope".into(),
                    context: ":root".into(),
                    status: Some("ready".into()),
                    owner: None,
                    token_version: None,
                    changelog: None,
                    components: None,
                },
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn css_then_restore_revision() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.css");
        let second = dir.path().join("second.css");
        std::fs::write(&first, ".a{color:red}").unwrap();
        std::fs::write(&second, ".a{color:blue}").unwrap();

        let store = Arc::new(JsonFileStore::open(dir.path().join("options.json")).unwrap());
        let service = StyleService::new(store.clone());
        for file in [&first, &second] {
            let (result, _) = run(
                &service,
                Command::Css {
                    file: Some(file.clone()),
                    tablet: None,
                    mobile: None,
                    append: false,
                },
            );
            result.unwrap();
        }

        let oldest = service
            .revisions()
            .list(Some(resolve_option("css")))
            .pop()
            .unwrap();
        let (result, out) = run(
            &service,
            Command::Revisions {
                action: RevisionsCommand::Restore { id: oldest.id.clone() },
            },
        );
        result.unwrap();
        assert!(out.starts_with("restored "));
        assert_eq!(
            store.get_string(keys::ACTIVE_CSS).as_deref(),
            Some(".a{color:red}")
        );
    }

    #[test]
    fn restore_unknown_revision_is_an_error() {
        let (_store, service) = memory_service();
        let (result, _) = run(
            &service,
            Command::Revisions {
                action: RevisionsCommand::Restore { id: "nope".into() },
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn presets_import_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.yaml");
        std::fs::write(
            &path,
            "card:\n  name: Card\n  scope: .card\n  props:\n    color: red\n",
        )
        .unwrap();

        let (_store, service) = memory_service();
        let (result, out) = run(
            &service,
            Command::Presets {
                action: PresetsCommand::Import { file: path },
            },
        );
        result.unwrap();
        assert_eq!(out, "1 presets stored\n");

        let (result, _) = run(
            &service,
            Command::Presets {
                action: PresetsCommand::Delete {
                    id: "card".into(),
                    glow: false,
                },
            },
        );
        result.unwrap();
        assert!(service.presets().presets().is_empty());
    }

    #[test]
    fn config_init_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let (_store, service) = memory_service();
        let config = StyleKitConfig::default();
        let runner = Runner {
            service: &service,
            config: &config,
            config_path: Some(&path),
        };
        let mut out = Vec::new();
        runner
            .run(
                Command::Config {
                    action: ConfigCommand::Init,
                },
                &mut out,
            )
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn option_aliases() {
        assert_eq!(resolve_option("tokens"), keys::TOKENS_CSS);
        assert_eq!(resolve_option("css"), keys::ACTIVE_CSS);
        assert_eq!(resolve_option("stylekit_other"), "stylekit_other");
    }
}
