use envconfig::Envconfig;
use url::Url;

use crate::lookup::DEMO_API_KEY;

#[derive(Envconfig, Debug, Clone)]
pub struct CardapioConfig {
    #[envconfig(
        from = "CARDAPIO_API_URL",
        default = "https://integracao.cardapioweb.com/api/partner/v1/merchant/payment_methods"
    )]
    pub api_url: Url,

    // Falls back to DEMO_API_KEY when unset.
    #[envconfig(from = "CARDAPIO_DEMO_API_KEY")]
    pub demo_api_key: Option<String>,
}

impl CardapioConfig {
    /// Publicly known key that switches the lookup to the demo catalog.
    pub fn demo_api_key(&self) -> &str {
        self.demo_api_key.as_deref().unwrap_or(DEMO_API_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn demo_key_defaults_to_published_sentinel() {
        let config = CardapioConfig::init_from_hashmap(&HashMap::new()).unwrap();
        assert_eq!(config.demo_api_key(), DEMO_API_KEY);
        assert_eq!(
            config.api_url.as_str(),
            "https://integracao.cardapioweb.com/api/partner/v1/merchant/payment_methods"
        );
    }

    #[test]
    fn demo_key_can_be_overridden() {
        let vars = HashMap::from([("CARDAPIO_DEMO_API_KEY".to_string(), "other".to_string())]);
        let config = CardapioConfig::init_from_hashmap(&vars).unwrap();
        assert_eq!(config.demo_api_key(), "other");
    }
}
