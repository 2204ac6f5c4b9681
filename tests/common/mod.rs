use studiochat::config::{BackendConfig, Config};

/// Backend configuration pointed at a mock server
#[allow(dead_code)]
pub fn backend_config(base_url: &str) -> BackendConfig {
    BackendConfig {
        base_url: base_url.to_string(),
        timeout_seconds: Some(5),
        ..BackendConfig::default()
    }
}

/// Full configuration pointed at a mock server
#[allow(dead_code)]
pub fn config_for(base_url: &str) -> Config {
    let mut config = Config::default();
    config.backend = backend_config(base_url);
    config
}

/// An address nothing listens on
#[allow(dead_code)]
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/api", port)
}
