use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

// Per-request timeouts in the Bria client override this default.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client")
});

pub fn http_client() -> &'static Client {
    &HTTP_CLIENT
}
