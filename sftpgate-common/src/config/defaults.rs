use std::time::Duration;

use crate::ListenEndpoint;

pub(crate) const fn _default_true() -> bool {
    true
}

pub(crate) const fn _default_false() -> bool {
    false
}

#[inline]
pub(crate) fn _default_http_listen() -> ListenEndpoint {
    ListenEndpoint::any(3000)
}

#[inline]
pub(crate) fn _default_connect_timeout() -> Duration {
    Duration::from_secs(20)
}

#[inline]
pub(crate) fn _default_operation_timeout() -> Duration {
    Duration::from_secs(60)
}

#[inline]
pub(crate) fn _default_close_timeout() -> Duration {
    Duration::from_secs(5)
}

#[inline]
pub(crate) fn _default_inactivity_timeout() -> Duration {
    Duration::from_secs(60)
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|x| (*x).to_owned()).collect()
}

// Broad on purpose: older servers only speak group1/group14 and CBC ciphers.
pub(crate) fn _default_kex_algorithms() -> Vec<String> {
    owned(&[
        "diffie-hellman-group1-sha1",
        "ecdh-sha2-nistp256",
        "ecdh-sha2-nistp384",
        "ecdh-sha2-nistp521",
        "diffie-hellman-group-exchange-sha256",
        "diffie-hellman-group14-sha1",
    ])
}

pub(crate) fn _default_cipher_algorithms() -> Vec<String> {
    owned(&[
        "3des-cbc",
        "aes128-ctr",
        "aes192-ctr",
        "aes256-ctr",
        "aes128-gcm",
        "aes128-gcm@openssh.com",
        "aes256-gcm",
        "aes256-gcm@openssh.com",
    ])
}

pub(crate) fn _default_host_key_algorithms() -> Vec<String> {
    owned(&[
        "ssh-rsa",
        "ecdsa-sha2-nistp256",
        "ecdsa-sha2-nistp384",
        "ecdsa-sha2-nistp521",
    ])
}

pub(crate) fn _default_mac_algorithms() -> Vec<String> {
    owned(&["hmac-sha2-256", "hmac-sha2-512", "hmac-sha1"])
}
