//! TLS for `sslmode=require` connections.
//!
//! `require` means the session is encrypted but the server certificate is not
//! checked against any trust store, matching libpq. Benchmark targets are
//! usually local or CI instances with self-signed certificates.
//!
//! This module provides:
//! - [`RequireModeVerifier`]: a [`rustls::client::danger::ServerCertVerifier`] impl
//! - [`build_rustls_client_config`]: returns a `rustls::ClientConfig` using it

use std::sync::Arc;

use anyhow::{anyhow, Result};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, Error, SignatureScheme};

fn ensure_crypto_provider_installed() -> Result<()> {
    if CryptoProvider::get_default().is_some() {
        return Ok(());
    }

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_ok()
    {
        return Ok(());
    }

    // Lost a race with another installer; fine as long as someone won.
    if CryptoProvider::get_default().is_some() {
        return Ok(());
    }

    Err(anyhow!("Failed to initialize rustls crypto provider"))
}

/// Accepts any server certificate but still checks handshake signatures, so
/// the peer must hold the key of the certificate it presents.
#[derive(Debug)]
pub struct RequireModeVerifier {
    provider: Arc<CryptoProvider>,
}

impl RequireModeVerifier {
    pub fn new(provider: Arc<CryptoProvider>) -> Self {
        Self { provider }
    }
}

impl ServerCertVerifier for RequireModeVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, Error> {
        log::debug!("sslmode=require: not verifying certificate of {server_name:?}");
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// Build the `rustls::ClientConfig` handed to the postgres TLS connector.
pub fn build_rustls_client_config() -> Result<ClientConfig> {
    ensure_crypto_provider_installed()?;
    let provider = CryptoProvider::get_default()
        .cloned()
        .ok_or_else(|| anyhow!("no rustls crypto provider installed"))?;

    let config = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(RequireModeVerifier::new(provider)))
        .with_no_client_auth();
    Ok(config)
}
