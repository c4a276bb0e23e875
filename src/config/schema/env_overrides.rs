use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PLANTSNAP_API_URL")
            && !url.is_empty()
        {
            self.api_url = url;
        }

        if let Ok(model) = std::env::var("PLANTSNAP_MODEL")
            && !model.is_empty()
        {
            self.model = model;
        }

        if let Ok(path) = std::env::var("PLANTSNAP_SECRETS_PATH")
            && !path.is_empty()
        {
            self.secrets.store_path = Some(path);
        }
    }
}
