//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use rv_config::RvConfig;

#[test]
fn loads_store_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
path = "./inventory.duckdb"
extension_repository = "http://mirror.local/extensions"
"#,
        )?;

        let config: RvConfig = Figment::from(Serialized::defaults(RvConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.path, "./inventory.duckdb");
        assert_eq!(
            config.store.extension_repository.as_deref(),
            Some("http://mirror.local/extensions")
        );
        assert!(!config.store.is_in_memory());
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults_for_other_sections() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[output]
pretty = false
",
        )?;

        let config: RvConfig = Figment::from(Serialized::defaults(RvConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(!config.output.pretty);
        assert_eq!(config.ingest.min_tables, 1);
        assert!(config.store.is_in_memory());
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[ingest]
min_tables = 2
",
        )?;
        jail.set_env("RVL_INGEST__MIN_TABLES", "5");

        let config: RvConfig = Figment::from(Serialized::defaults(RvConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("RVL_").split("__"))
            .extract()?;

        assert_eq!(config.ingest.min_tables, 5);
        Ok(())
    });
}

#[test]
fn local_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "rvlake.toml",
            r#"
[store]
path = "local.duckdb"
"#,
        )?;

        let config = RvConfig::load().expect("config loads");
        assert_eq!(config.store.path, "local.duckdb");
        Ok(())
    });
}
