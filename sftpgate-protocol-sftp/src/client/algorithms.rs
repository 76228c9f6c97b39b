use std::borrow::Cow;
use std::str::FromStr;

use russh::keys::Algorithm;
use russh::{cipher, kex, mac, Preferred};
use sftpgate_common::SecurityPolicy;

use crate::{DiagnosticSink, SftpClientError, TransportConfig};

/// A policy entry the SSH stack has no implementation for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedAlgorithm {
    pub category: &'static str,
    pub name: String,
}

struct Selection<T> {
    supported: Vec<T>,
    unsupported: Vec<String>,
}

fn select<T, F>(names: &[String], parse: F) -> Selection<T>
where
    F: Fn(&str) -> Option<T>,
{
    let mut supported = vec![];
    let mut unsupported = vec![];
    for name in names {
        match parse(name) {
            Some(x) => supported.push(x),
            None => unsupported.push(name.clone()),
        }
    }
    Selection {
        supported,
        unsupported,
    }
}

fn parse_kex(name: &str) -> Option<kex::Name> {
    kex::Name::try_from(name).ok()
}

fn parse_cipher(name: &str) -> Option<cipher::Name> {
    cipher::Name::try_from(name).ok()
}

fn parse_mac(name: &str) -> Option<mac::Name> {
    mac::Name::try_from(name).ok()
}

fn parse_host_key(name: &str) -> Option<Algorithm> {
    match Algorithm::from_str(name) {
        Ok(Algorithm::Other(_)) | Err(_) => None,
        Ok(x) => Some(x),
    }
}

fn finish<T>(
    category: &'static str,
    selection: Selection<T>,
    sink: &DiagnosticSink,
) -> Result<Vec<T>, SftpClientError> {
    for name in selection.unsupported {
        sink.emit(format_args!("Skipping unsupported {category} algorithm {name}"));
    }
    if selection.supported.is_empty() {
        return Err(SftpClientError::NoSupportedAlgorithms(category));
    }
    Ok(selection.supported)
}

/// Builds the russh preference lists from the allow-list carried by `config`.
///
/// Order is preserved. Names russh does not implement are dropped with a
/// diagnostic line, and a category left empty fails the connection.
pub fn select_algorithms(config: &TransportConfig) -> Result<Preferred, SftpClientError> {
    let sink = config.diagnostics();

    let mut kex = finish("key exchange", select(config.kex(), parse_kex), sink)?;
    kex.push(kex::EXTENSION_SUPPORT_AS_CLIENT);
    kex.push(kex::EXTENSION_OPENSSH_STRICT_KEX_AS_CLIENT);

    let key = finish("host key", select(config.host_key(), parse_host_key), sink)?;
    let cipher = finish("cipher", select(config.cipher(), parse_cipher), sink)?;
    let mac = finish("MAC", select(config.mac(), parse_mac), sink)?;

    Ok(Preferred {
        kex: Cow::Owned(kex),
        key: Cow::Owned(key),
        cipher: Cow::Owned(cipher),
        mac: Cow::Owned(mac),
        ..Preferred::default()
    })
}

/// Lists every policy entry that would be skipped at connect time.
pub fn unsupported_algorithms(policy: &SecurityPolicy) -> Vec<UnsupportedAlgorithm> {
    let mut result = vec![];
    let mut collect = |category: &'static str, names: Vec<String>| {
        result.extend(
            names
                .into_iter()
                .map(|name| UnsupportedAlgorithm { category, name }),
        );
    };
    collect("key exchange", select(&policy.kex, parse_kex).unsupported);
    collect("host key", select(&policy.host_key, parse_host_key).unsupported);
    collect("cipher", select(&policy.cipher, parse_cipher).unsupported);
    collect("MAC", select(&policy.mac, parse_mac).unsupported);
    result
}
