//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;


use crate::schema::StyleKitConfig;
use stylekit_common::ConfigError;

use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &StyleKitConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_revisions(&mut errors, config);
    validate_responsive(&mut errors, config);
    validate_tokens(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_revisions(errors: &mut Vec<String>, config: &StyleKitConfig) {
    validate_range(
        errors,
        "revisions.max_revisions",
        u32::try_from(config.revisions.max_revisions).unwrap_or(u32::MAX),
        1,
        500,
    );
}

fn validate_responsive(errors: &mut Vec<String>, config: &StyleKitConfig) {
    let responsive = &config.responsive;
    validate_range(
        errors,
        "responsive.tablet_max_width",
        responsive.tablet_max_width,
        320,
        4096,
    );
    validate_range(
        errors,
        "responsive.mobile_max_width",
        responsive.mobile_max_width,
        1,
        4096,
    );
    if responsive.mobile_max_width >= responsive.tablet_max_width {
        errors.push(format!(
            "responsive.mobile_max_width = {} must be below responsive.tablet_max_width = {}",
            responsive.mobile_max_width, responsive.tablet_max_width
        ));
    }
}

fn validate_tokens(errors: &mut Vec<String>, config: &StyleKitConfig) {
    if config.tokens.default_group.trim().is_empty() {
        errors.push("tokens.default_group must not be empty".into());
    }
}
