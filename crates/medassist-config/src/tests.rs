#[cfg(test)]
mod tests {
    use super::super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.server.max_message_chars, 1000);
        assert_eq!(config.llm.provider, Provider::Gemini);
        assert_eq!(config.llm.model(), "gemini-1.5-flash");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::from_toml_str(
            r#"
            [server]
            bind = "0.0.0.0:8080"

            [llm]
            provider = "ollama"
            model = "mistral"
            base_url = "http://localhost:11434"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.max_message_chars, 1000);
        assert_eq!(config.llm.provider, Provider::Ollama);
        assert_eq!(config.llm.model(), "mistral");
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:11434"));
    }

    #[test]
    fn test_unknown_provider_in_file_is_parse_error() {
        let err = Config::from_toml_str("[llm]\nprovider = \"watson\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_key_is_picked_up() {
        let mut config = Config::default();
        config.apply_env(env(&[("GEMINI_API_KEY", "AIza-test")])).unwrap();
        assert_eq!(config.llm.resolve_api_key().unwrap().as_deref(), Some("AIza-test"));
    }

    #[test]
    fn test_env_overrides_bind_and_provider() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("MEDASSIST_BIND", "0.0.0.0:9000"),
                ("MEDASSIST_LLM_PROVIDER", "OpenAI"),
                ("OPENAI_API_KEY", "sk-test"),
            ]))
            .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.llm.provider, Provider::OpenAi);
        assert_eq!(config.llm.model(), "gpt-4o-mini");
        assert_eq!(config.llm.resolve_api_key().unwrap().as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_unknown_provider_in_env_is_rejected() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("MEDASSIST_LLM_PROVIDER", "watson")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "MEDASSIST_LLM_PROVIDER", .. }));
    }

    #[test]
    fn test_placeholder_key_counts_as_missing() {
        let mut config = Config::default();
        config.apply_env(env(&[("GEMINI_API_KEY", API_KEY_PLACEHOLDER)])).unwrap();
        let err = config.llm.resolve_api_key().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingApiKey { provider: "gemini", env_var: "GEMINI_API_KEY" }
        ));
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = Config::from_toml_str("[llm]\nprovider = \"ollama\"\n").unwrap();
        assert_eq!(config.llm.resolve_api_key().unwrap(), None);
    }

    #[test]
    fn test_zero_message_limit_is_invalid() {
        let config = Config::from_toml_str("[server]\nmax_message_chars = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "server.max_message_chars", .. })
        ));
    }

    #[test]
    fn test_temperature_out_of_range_is_invalid() {
        let config = Config::from_toml_str("[llm]\ntemperature = 3.5\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "llm.temperature", .. })
        ));
    }
}
