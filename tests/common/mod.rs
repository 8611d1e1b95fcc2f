use playscout::Config;
use std::time::Duration;

pub mod test_helpers {
    use super::*;

    pub fn setup_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    /// Config pointing both external endpoints at a mock server
    pub fn test_config(base_url: &str) -> Config {
        Config {
            play_base_url: base_url.to_string(),
            llm_base_url: base_url.to_string(),
            catalog_timeout: Duration::from_secs(2),
            llm_timeout: Duration::from_secs(2),
            ..Config::default()
        }
    }
}
