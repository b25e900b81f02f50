use appscan_config::{AppScanConfig, LOCAL_CONFIG_FILE};
use figment::Jail;
use pretty_assertions::assert_eq;

#[test]
fn env_sets_nested_values() {
    Jail::expect_with(|jail| {
        jail.set_env("APPSCAN_DISCOVERY__KEEPER_SUFFIX", "Store");
        jail.set_env("APPSCAN_DISCOVERY__MAX_EMBED_DEPTH", "3");
        jail.set_env("APPSCAN_GENERAL__TIMEOUT_SECS", "10");

        let config = AppScanConfig::load().expect("config loads");
        assert_eq!(config.discovery.keeper_suffix, "Store");
        assert_eq!(config.discovery.max_embed_depth, 3);
        assert_eq!(config.general.timeout_secs, Some(10));
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            LOCAL_CONFIG_FILE,
            "[discovery]\nkeeper_suffix = \"FromFile\"\nmax_eval_depth = 12\n",
        )?;
        jail.set_env("APPSCAN_DISCOVERY__KEEPER_SUFFIX", "FromEnv");

        let config = AppScanConfig::load().expect("config loads");
        assert_eq!(config.discovery.keeper_suffix, "FromEnv");
        assert_eq!(config.discovery.max_eval_depth, 12);
        Ok(())
    });
}

#[test]
fn env_beats_explicit_file() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[walk]\nrespect_gitignore = true\n")?;
        jail.set_env("APPSCAN_WALK__RESPECT_GITIGNORE", "false");

        let config = AppScanConfig::load_from(Some(std::path::Path::new("custom.toml")))
            .expect("config loads");
        assert!(!config.walk.respect_gitignore);
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("APPSCAN_DISCOVERY__MAX_EVAL_DEPTH", "0");

        assert!(AppScanConfig::load().is_err());
        Ok(())
    });
}

#[test]
fn dotenv_file_feeds_env_layer() {
    Jail::expect_with(|jail| {
        // dotenvy writes the process env directly; use a key no other test reads unset.
        jail.create_file(".env", "APPSCAN_GENERAL__TIMEOUT_SECS=45\n")?;

        let config = AppScanConfig::load_with_dotenv(None).expect("config loads");
        assert_eq!(config.general.timeout_secs, Some(45));
        Ok(())
    });
}
