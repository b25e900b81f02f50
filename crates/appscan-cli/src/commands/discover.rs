use std::time::Duration;

use appscan_config::AppScanConfig;
use appscan_discovery::{Discovery, discover};
use appscan_parser::Cancellation;

use crate::cli::{DiscoverArgs, GlobalFlags};
use crate::output::{TextView, output, section};

/// Handle `appscan discover`.
///
/// A [`appscan_discovery::DiscoveryError`] is returned unwrapped so `main`
/// can map it to an exit code.
pub fn handle(args: &DiscoverArgs, config: &AppScanConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .or_else(|| config.general.timeout());
    let cancel = timeout.map_or_else(Cancellation::new, Cancellation::with_timeout);

    tracing::debug!(root = %args.root.display(), hint = ?args.hint, ?timeout, "discover");
    let discovery = discover(
        &args.root,
        args.hint.as_deref(),
        &config.walk,
        &config.discovery,
        &cancel,
    )?;

    if !discovery.parse_errors.is_empty() && !flags.quiet {
        tracing::warn!(
            files = discovery.parse_errors.len(),
            "some files failed to parse and were skipped"
        );
    }
    output(&discovery, flags.format)
}

impl TextView for Discovery {
    fn to_text(&self) -> String {
        let modules: Vec<Vec<String>> = self
            .modules
            .iter()
            .map(|m| vec![m.unit.clone(), m.name.clone()])
            .collect();
        let fields: Vec<Vec<String>> = self
            .keeper_fields
            .iter()
            .map(|f| vec![f.name.clone(), f.type_name.clone()])
            .collect();

        let mut sections = vec![
            format!("entry type: {}", self.entry_type),
            section("modules", &["unit", "name"], &modules),
            section("keeper fields", &["name", "type"], &fields),
        ];
        if !self.parse_errors.is_empty() {
            let errors: Vec<Vec<String>> = self
                .parse_errors
                .iter()
                .map(|e| {
                    let at = e.line.map_or_else(
                        || e.path.display().to_string(),
                        |line| format!("{}:{line}", e.path.display()),
                    );
                    vec![at, e.message.clone()]
                })
                .collect();
            sections.push(section("parse errors", &["file", "message"], &errors));
        }
        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use appscan_discovery::{KeeperField, TypeRef};
    use appscan_parser::ParseError;

    use super::*;

    fn discovery() -> Discovery {
        Discovery {
            entry_type: TypeRef::new("example.com/chain/app", "App"),
            modules: vec![TypeRef::new("github.com/cosmos/cosmos-sdk/x/auth", "AppModuleBasic")],
            keeper_fields: vec![KeeperField {
                name: "AccountKeeper".to_string(),
                type_name: "authkeeper.AccountKeeper".to_string(),
            }],
            parse_errors: Vec::new(),
        }
    }

    #[test]
    fn text_lists_entry_modules_and_fields() {
        let text = discovery().to_text();
        assert!(text.starts_with("entry type: example.com/chain/app.App"));
        assert!(text.contains("modules (1)"));
        assert!(text.contains("github.com/cosmos/cosmos-sdk/x/auth"));
        assert!(text.contains("keeper fields (1)"));
        assert!(text.contains("authkeeper.AccountKeeper"));
        assert!(!text.contains("parse errors"));
    }

    #[test]
    fn text_shows_parse_errors_with_line() {
        let mut discovery = discovery();
        discovery.parse_errors.push(ParseError {
            path: PathBuf::from("x/broken/broken.go"),
            line: Some(3),
            message: "syntax error".to_string(),
        });
        let text = discovery.to_text();
        assert!(text.contains("parse errors (1)"));
        assert!(text.contains("x/broken/broken.go:3"));
    }

    #[test]
    fn missing_root_fails_with_invalid_path() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let args = DiscoverArgs {
            root: tmp.path().join("missing"),
            hint: None,
            timeout: None,
        };
        let flags = GlobalFlags {
            format: crate::cli::OutputFormat::Json,
            quiet: true,
            verbose: false,
            config: None,
        };
        let err = handle(&args, &AppScanConfig::default(), &flags).expect_err("should fail");
        assert!(matches!(
            err.downcast_ref::<appscan_discovery::DiscoveryError>(),
            Some(appscan_discovery::DiscoveryError::InvalidPath { .. })
        ));
    }
}
