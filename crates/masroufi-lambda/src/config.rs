use std::env;

use masroufi_assistant::upstream::OpenAiConfig;

/// Runtime configuration, read once at cold start.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub openai: OpenAiConfig,
    /// When set, `/assistant` and `/invite` require a valid session token signed with it.
    pub jwt_secret: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Self {
        Self {
            openai: OpenAiConfig::from_env(),
            jwt_secret: env::var("MASROUFI_JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}
