use super::Lookup;

/// Keys for the live traffic and weather providers. Unset keys mean mock data.
#[derive(Debug, Clone, Default)]
pub struct IntegrationEnvConfig {
    pub google_maps_api_key: Option<String>,
    pub openweather_api_key: Option<String>,
}

impl IntegrationEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&super::process_env)
    }

    pub(crate) fn from_lookup(get: Lookup) -> Self {
        Self {
            google_maps_api_key: get("GOOGLE_MAPS_API_KEY"),
            openweather_api_key: get("OPENWEATHER_API_KEY"),
        }
    }
}
