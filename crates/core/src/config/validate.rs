use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Sampling parameters are in range
/// - Token limits are coherent
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Sampling validation
    let params = &config.llm.params;
    if !(0.0..=1.0).contains(&params.top_p) {
        return Err(ConfigError::ValidationError(format!(
            "llm.params.top_p must be in [0, 1], got {}",
            params.top_p
        )));
    }
    if params.temperature < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "llm.params.temperature cannot be negative, got {}",
            params.temperature
        )));
    }
    if params.max_new_tokens == 0 {
        return Err(ConfigError::ValidationError(
            "llm.params.max_new_tokens cannot be 0".to_string(),
        ));
    }
    if params.min_new_tokens > params.max_new_tokens {
        return Err(ConfigError::ValidationError(format!(
            "llm.params.min_new_tokens ({}) exceeds max_new_tokens ({})",
            params.min_new_tokens, params.max_new_tokens
        )));
    }

    Ok(())
}
