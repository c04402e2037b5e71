use chrono::{Duration as Days, TimeZone, Utc};
use ssl_expiration2::SslExpiration;
use std::path::Path;
use x509_parser::pem::parse_x509_pem;

use crate::{
    config::Config,
    configuration::{CERT_FILE_NAME, PROBE_TIMEOUT},
    debug,
    states::status::{SslStatus, StatusSource},
};


/// Probe current certificate status of a domain. Channels are attempted in
/// order: locally stored certificate file, live TLS handshake, live handshake
/// against the www-prefixed variant. A channel that cannot complete within the
/// probe timeout yields no result and the next channel is tried. When every
/// channel fails the result is a not-present status, not an error:
pub fn probe_domain(domain: &str) -> SslStatus {
    let cert_file = format!("{}/{}/{}", Config::load().certs_dir(), domain, CERT_FILE_NAME);
    probe_domain_with_cert_file(domain, &cert_file)
}


/// Probe with an explicit local certificate file location:
pub fn probe_domain_with_cert_file(domain: &str, cert_file: &str) -> SslStatus {
    if let Some(status) = probe_local_certificate(domain, cert_file) {
        return status;
    }
    if let Some(status) = probe_live(domain, domain, StatusSource::LiveProbe) {
        return status;
    }
    let www_variant = format!("www.{domain}");
    if let Some(status) = probe_live(domain, &www_variant, StatusSource::WwwFallback) {
        return status;
    }
    debug!("No probe channel detected a certificate for domain: {domain}");
    SslStatus::not_present(domain)
}


/// Read and parse the locally stored certificate file, when one exists.
/// Unreadable or unparsable files yield no result so the caller falls back
/// to the live channels:
fn probe_local_certificate(domain: &str, cert_file: &str) -> Option<SslStatus> {
    if !Path::new(cert_file).exists() {
        return None;
    }
    let pem_data = std::fs::read(cert_file).ok()?;
    let (_, pem) = parse_x509_pem(&pem_data).ok()?;
    let (_, cert) = x509_parser::parse_x509_certificate(&pem.contents).ok()?;
    let expiry = Utc
        .timestamp_opt(cert.validity().not_after.timestamp(), 0)
        .single()?;
    let issuer = cert.issuer().to_string();
    let now = Utc::now();
    let days = (expiry - now).num_days();
    debug!("Local certificate for domain: {domain} valid for: {days} days. Issuer: {issuer}");
    Some(SslStatus::detected(
        domain,
        days,
        expiry <= now,
        Some(expiry),
        Some(issuer),
        StatusSource::LocalCertificate,
    ))
}


/// Live TLS handshake channel. The expiry instant is estimated from the
/// remaining validity days, the issuer is not exposed by this channel:
fn probe_live(domain: &str, probe_name: &str, source: StatusSource) -> Option<SslStatus> {
    match SslExpiration::from_domain_name_with_timeout(probe_name, PROBE_TIMEOUT) {
        Ok(validator) => {
            let days = i64::from(validator.days());
            debug!("Live probe of: {probe_name} for domain: {domain} gave: {days} days left");
            Some(SslStatus::detected(
                domain,
                days,
                validator.is_expired(),
                Some(Utc::now() + Days::days(days)),
                None,
                source,
            ))
        }
        Err(err) => {
            debug!("Live probe of: {probe_name} for domain: {domain} gave no result: {err}");
            None
        }
    }
}
