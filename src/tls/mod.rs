//! Live TLS certificate probing.
//!
//! Connects to `name:443`, completes a handshake, and extracts the leaf
//! certificate's issuer and expiry. The chain is deliberately NOT validated
//! against trust roots: the goal is observation, not validation, and an
//! expired or self-signed certificate is exactly the kind of thing worth
//! reporting.
//!
//! Uses `tokio-rustls` for the async handshake and `x509-parser` for the
//! leaf certificate.

mod extract;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};

use extract::{issuer_name, not_after_utc};

/// Issuer and expiry extracted from a live leaf certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafCertificate {
    pub issuer: String,
    pub not_after: Option<DateTime<Utc>>,
}

/// Accepts any presented certificate while still checking handshake
/// signatures, so the connection completes against hosts whose chains would
/// never pass a root store.
#[derive(Debug)]
struct AcceptAnyCertificate(CryptoProvider);

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

fn probe_client_config() -> ClientConfig {
    let provider = rustls::crypto::ring::default_provider();
    ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate(provider)))
        .with_no_client_auth()
}

/// Probes `host:443` and extracts the leaf certificate.
///
/// Connect and handshake each carry their own short timeout so a stuck
/// probe cannot hold its worker slot past the scan deadline. Any failure
/// (refused connection, timeout, handshake error, parse error) is an `Err`;
/// the orchestrator treats that as a normal outcome for a name with no TLS
/// service and degrades the cert fields to empty.
pub async fn probe_certificate(host: &str) -> Result<LeafCertificate> {
    let server_name = ServerName::try_from(host.to_string())
        .map_err(|e| anyhow!("invalid server name {host}: {e}"))?;

    let sock = match tokio::time::timeout(
        std::time::Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((host, 443)),
    )
    .await
    {
        Ok(Ok(sock)) => sock,
        Ok(Err(e)) => return Err(anyhow!("failed to connect to {host}:443: {e}")),
        Err(_) => {
            return Err(anyhow!(
                "TCP connection timeout for {host}:443 ({TCP_CONNECT_TIMEOUT_SECS}s)"
            ))
        }
    };

    let connector = TlsConnector::from(Arc::new(probe_client_config()));
    let tls_stream = match tokio::time::timeout(
        std::time::Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(anyhow!("TLS handshake failed for {host}: {e}")),
        Err(_) => {
            return Err(anyhow!(
                "TLS handshake timeout for {host} ({TLS_HANDSHAKE_TIMEOUT_SECS}s)"
            ))
        }
    };

    let (_, session) = tls_stream.get_ref();
    let certs = session
        .peer_certificates()
        .ok_or_else(|| anyhow!("no peer certificates presented by {host}"))?;
    let leaf = certs
        .first()
        .ok_or_else(|| anyhow!("empty certificate chain from {host}"))?;

    let (_, cert) = x509_parser::parse_x509_certificate(leaf.as_ref())?;
    let issuer = issuer_name(&cert);
    let not_after = not_after_utc(&cert);
    if not_after.is_none() {
        log::debug!("leaf certificate for {host} has unparseable NotAfter");
    }

    log::debug!("probed {host}: issuer={issuer}");
    Ok(LeafCertificate { issuer, not_after })
}
