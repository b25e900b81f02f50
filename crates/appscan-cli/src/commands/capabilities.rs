use appscan_config::AppScanConfig;
use appscan_discovery::MethodSignature;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::{TextView, output, section};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CapabilitiesResponse<'c> {
    capabilities: &'c [MethodSignature],
    registry_constructors: &'c [String],
    keeper_suffix: &'c str,
}

/// Handle `appscan capabilities`.
pub fn handle(config: &AppScanConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = CapabilitiesResponse {
        capabilities: &config.discovery.capabilities,
        registry_constructors: &config.discovery.registry_constructors,
        keeper_suffix: &config.discovery.keeper_suffix,
    };
    output(&response, flags.format)
}

fn arity(value: Option<usize>) -> String {
    value.map_or_else(|| "any".to_string(), |n| n.to_string())
}

impl TextView for CapabilitiesResponse<'_> {
    fn to_text(&self) -> String {
        let methods: Vec<Vec<String>> = self
            .capabilities
            .iter()
            .map(|m| vec![m.name.clone(), arity(m.params), arity(m.results)])
            .collect();
        let ctors: Vec<Vec<String>> = self
            .registry_constructors
            .iter()
            .map(|c| vec![c.clone()])
            .collect();
        [
            section("capabilities", &["method", "params", "results"], &methods),
            section("registry constructors", &["function"], &ctors),
            format!("keeper suffix: {}", self.keeper_suffix),
        ]
        .join("\n\n")
    }
}
