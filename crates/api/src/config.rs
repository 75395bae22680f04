//! Types for use when configuring InfoMax modules.

use crate::*;

/// helper transcode function
fn tc<S: serde::Serialize, D: serde::de::DeserializeOwned>(
    s: &S,
) -> ImResult<D> {
    serde_json::from_str(
        &serde_json::to_string(s)
            .map_err(|e| ImError::other_src("encode", e))?,
    )
    .map_err(|e| ImError::other_src("decode", e))
}

/// Denotes a type used to configure a specific InfoMax module.
///
/// The types behind this trait are for configuration that cannot be
/// changed at runtime, the likes of which might be found in a
/// configuration file. Deserialization should be tolerant to missing
/// properties, setting sane defaults.
pub trait ModConfig:
    'static
    + Sized
    + Default
    + std::fmt::Debug
    + serde::Serialize
    + serde::de::DeserializeOwned
    + Send
    + Sync
{
}

/// InfoMax configuration.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Config(serde_json::Map<String, serde_json::Value>);

impl Config {
    /// When generating a default or example configuration file, a
    /// mutable reference of this config struct is passed to the module
    /// factories that are configured to be used. Those factories should
    /// call this function to add their default configuration parameters
    /// to that file.
    pub fn add_default_module_config<M: ModConfig>(
        &mut self,
        module_name: String,
    ) -> ImResult<()> {
        if self.0.contains_key(&module_name) {
            return Err(ImError::other(format!(
                "Refusing to overwrite conflicting module name: {module_name}"
            )));
        }
        self.0.insert(module_name, tc(&M::default())?);
        Ok(())
    }

    /// On initialization, the factory function for every module is
    /// called with an immutable reference to this config struct. Each
    /// module may choose to call this function to extract its module
    /// config. A missing entry yields the module default.
    pub fn get_module_config<M: ModConfig>(
        &self,
        module_name: &str,
    ) -> ImResult<M> {
        self.0
            .get(module_name)
            .map(tc)
            .unwrap_or_else(|| Ok(M::default()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct TestMod {
        #[serde(default)]
        lifetime_ms: u32,
        #[serde(default)]
        tag: String,
    }

    impl Default for TestMod {
        fn default() -> Self {
            Self {
                lifetime_ms: 1000,
                tag: "".into(),
            }
        }
    }

    impl ModConfig for TestMod {}

    #[test]
    fn default_config_roundtrip() {
        let mut config = Config::default();
        config
            .add_default_module_config::<TestMod>("testMod".into())
            .unwrap();

        assert_eq!(
            r#"{"testMod":{"lifetimeMs":1000,"tag":""}}"#,
            serde_json::to_string(&config).unwrap()
        );

        let loaded: TestMod = config.get_module_config("testMod").unwrap();
        assert_eq!(TestMod::default(), loaded);
    }

    #[test]
    fn duplicate_module_name_is_rejected() {
        let mut config = Config::default();
        config
            .add_default_module_config::<TestMod>("testMod".into())
            .unwrap();
        assert!(config
            .add_default_module_config::<TestMod>("testMod".into())
            .is_err());
    }

    #[test]
    fn missing_and_partial_entries_fall_back_to_defaults() {
        // absent module entry yields the default
        let config = Config::default();
        let loaded: TestMod = config.get_module_config("testMod").unwrap();
        assert_eq!(TestMod::default(), loaded);

        // a hand-edited partial entry keeps defaults for missing props
        let config: Config = serde_json::from_str(
            r#"{ "testMod": { "tag": "custom" } }"#,
        )
        .unwrap();
        let loaded: TestMod = config.get_module_config("testMod").unwrap();
        assert_eq!(0, loaded.lifetime_ms);
        assert_eq!("custom", loaded.tag);
    }
}
