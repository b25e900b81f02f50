#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use appscan_discovery::{Discovery, DiscoveryError, DiscoveryOptions, discover};
use appscan_parser::{Cancellation, WalkOptions};
use tempfile::TempDir;

pub const MODULE: &str = "example.com/chain";
pub const SDK_MODULE: &str = "github.com/cosmos/cosmos-sdk/types/module";

/// A Go project on disk, rooted at a `go.mod` declaring [`MODULE`].
pub struct GoTree {
    dir: TempDir,
}

impl GoTree {
    pub fn new() -> Self {
        let tree = Self {
            dir: tempfile::tempdir().expect("tempdir should be created"),
        };
        tree.file("go.mod", &format!("module {MODULE}\n\ngo 1.22\n"))
    }

    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("mkdir should succeed");
        fs::write(path, contents).expect("write should succeed");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn discover(&self) -> Result<Discovery, DiscoveryError> {
        self.discover_with(None, &DiscoveryOptions::default(), &Cancellation::new())
    }

    pub fn discover_hinted(&self, hint: &str) -> Result<Discovery, DiscoveryError> {
        self.discover_with(
            Some(&PathBuf::from(hint)),
            &DiscoveryOptions::default(),
            &Cancellation::new(),
        )
    }

    pub fn discover_with(
        &self,
        hint: Option<&Path>,
        options: &DiscoveryOptions,
        cancel: &Cancellation,
    ) -> Result<Discovery, DiscoveryError> {
        discover(self.path(), hint, &WalkOptions::default(), options, cancel)
    }
}

/// Go source of every default capability, declared on `*receiver`.
pub fn all_capabilities(receiver: &str) -> String {
    format!(
        r#"
func (app *{receiver}) Name() string {{ return "app" }}

func (app *{receiver}) LegacyAmino() *codec.LegacyAmino {{ return nil }}

func (app *{receiver}) AppCodec() codec.Codec {{ return nil }}

func (app *{receiver}) InterfaceRegistry() types.InterfaceRegistry {{ return nil }}

func (app *{receiver}) GetKey(storeKey string) *storetypes.KVStoreKey {{ return nil }}

func (app *{receiver}) BeginBlocker(ctx sdk.Context) (sdk.BeginBlock, error) {{ return sdk.BeginBlock{{}}, nil }}

func (app *{receiver}) EndBlocker(ctx sdk.Context) (sdk.EndBlock, error) {{ return sdk.EndBlock{{}}, nil }}

func (app *{receiver}) InitChainer(ctx sdk.Context, req *abci.RequestInitChain) (*abci.ResponseInitChain, error) {{
	return nil, nil
}}

func (app *{receiver}) RegisterAPIRoutes(apiSvr *api.Server, apiConfig config.APIConfig) {{}}
"#
    )
}

/// A minimal app file: the SDK imports plus `imports`, the given
/// declarations, an `App` struct with the given fields, and every
/// capability declared on `App`.
pub fn app_file(package: &str, imports: &[&str], decls: &str, fields: &str) -> String {
    let extra: String = imports.iter().map(|i| format!("\t{i}\n")).collect();
    format!(
        r#"package {package}

import (
	"github.com/cosmos/cosmos-sdk/types/module"
	"github.com/cosmos/cosmos-sdk/x/auth"
	"github.com/cosmos/cosmos-sdk/x/bank"
	"github.com/cosmos/cosmos-sdk/x/staking"
{extra})

{decls}

type App struct {{
{fields}
}}
{caps}"#,
        caps = all_capabilities("App")
    )
}

/// Modules rendered as `unit.Name`.
pub fn module_names(discovery: &Discovery) -> Vec<String> {
    discovery.modules.iter().map(ToString::to_string).collect()
}

pub fn sdk(module: &str, name: &str) -> String {
    format!("github.com/cosmos/cosmos-sdk/x/{module}.{name}")
}

pub fn local(unit: &str, name: &str) -> String {
    if unit.is_empty() {
        format!("{MODULE}.{name}")
    } else {
        format!("{MODULE}/{unit}.{name}")
    }
}
