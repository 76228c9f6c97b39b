use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Enum)]
pub enum EntryKind {
    #[serde(rename = "-")]
    #[oai(rename = "-")]
    File,
    #[serde(rename = "d")]
    #[oai(rename = "d")]
    Directory,
    #[serde(rename = "l")]
    #[oai(rename = "l")]
    Symlink,
}

/// `rwx` subsets for each permission class, e.g. `rw` / `r` / `r`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Object)]
pub struct EntryRights {
    pub user: String,
    pub group: String,
    pub other: String,
}

impl EntryRights {
    pub fn from_mode(mode: u32) -> Self {
        Self {
            user: rwx((mode >> 6) & 0o7),
            group: rwx((mode >> 3) & 0o7),
            other: rwx(mode & 0o7),
        }
    }
}

fn rwx(bits: u32) -> String {
    let mut s = String::with_capacity(3);
    if bits & 0o4 != 0 {
        s.push('r');
    }
    if bits & 0o2 != 0 {
        s.push('w');
    }
    if bits & 0o1 != 0 {
        s.push('x');
    }
    s
}

/// A single remote listing record, passed through as the server reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Object)]
#[serde(rename_all = "camelCase")]
#[oai(rename_all = "camelCase")]
pub struct DirectoryEntry {
    #[serde(rename = "type")]
    #[oai(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub size: u64,
    /// Milliseconds since the Unix epoch.
    pub modify_time: u64,
    /// Milliseconds since the Unix epoch.
    pub access_time: u64,
    pub rights: EntryRights,
    pub owner: u32,
    pub group: u32,
}
