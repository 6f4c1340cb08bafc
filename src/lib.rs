pub mod config;
pub mod credentials;
pub mod insight;
pub mod output;
pub mod scoring;
pub mod store;
pub mod telemetry;

/// Install the ring crypto provider for rustls (required for rustls 0.23+).
/// Safe to call more than once.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}
