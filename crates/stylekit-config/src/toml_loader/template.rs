//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# StyleKit Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[store]
# path = "/var/lib/stylekit/options.json"   # defaults to the platform data dir

[revisions]
# max_revisions = 20     # 1-500, shared across every option

[responsive]
# tablet_max_width = 1024   # 320-4096
# mobile_max_width = 767    # must be below tablet_max_width

[tokens]
# default_group = "General"

[logging]
# level = "INFO"         # TRACE, DEBUG, INFO, WARNING, ERROR
# json = false
"##
    .to_string()
}
