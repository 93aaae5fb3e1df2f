use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::decoder::ProfileDecoder;
use crate::payload::ProfilePayload;
use crate::Error;

pub const PROFILE_EXTENSION: &str = "mobileprovision";

/// Extension point granted to profiles that may sign a Safari web extension.
pub const SAFARI_WEB_EXTENSION: &str = "com.apple.Safari.web-extension";

/// Where the OS keeps profiles installed for the current user.
pub fn installed_profiles_dir() -> Result<PathBuf, Error> {
    let home = env::var("HOME").map_err(|_| Error::HomeMissing)?;
    if home.is_empty() {
        return Err(Error::HomeMissing);
    }
    Ok(PathBuf::from(home)
        .join("Library")
        .join("MobileDevice")
        .join("Provisioning Profiles"))
}

#[derive(Debug, Clone)]
pub struct DecodedProfile {
    pub path: PathBuf,
    pub payload: ProfilePayload,
}

/// A profile that passed the entitlement filter. Field derivations live on
/// `ProfilePayload`; this is the flat record handed to emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub uuid: String,
    pub team: String,
    pub bundle_id: String,
    pub path: PathBuf,
}

impl Candidate {
    fn from_decoded(profile: &DecodedProfile) -> Self {
        Self {
            name: profile.payload.display_name().to_string(),
            uuid: profile.payload.uuid().to_string(),
            team: profile.payload.team().to_string(),
            bundle_id: profile.payload.bundle_id().to_string(),
            path: profile.path.clone(),
        }
    }
}

// Directory order is whatever the OS hands back; it is not normalized, and
// selection downstream is first-match over exactly this order.
async fn profile_paths(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        // A machine with no profiles installed has no directory either.
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(PROFILE_EXTENSION) {
            paths.push(path);
        }
    }
    Ok(paths)
}

/// Decodes every installed profile, silently dropping files the decoder
/// rejects.
pub async fn decode_installed_profiles<D: ProfileDecoder>(
    decoder: &D,
    dir: &Path,
) -> Result<Vec<DecodedProfile>, Error> {
    let mut decoded = Vec::new();
    for path in profile_paths(dir).await? {
        match decoder.decode(&path).await {
            Some(payload) => decoded.push(DecodedProfile { path, payload }),
            None => log::debug!("skipping undecodable profile {}", path.display()),
        }
    }
    Ok(decoded)
}

/// All installed profiles entitled to `extension_point`, in enumeration
/// order. The caller selects the first.
pub async fn scan_candidates<D: ProfileDecoder>(
    decoder: &D,
    dir: &Path,
    extension_point: &str,
) -> Result<Vec<Candidate>, Error> {
    let decoded = decode_installed_profiles(decoder, dir).await?;
    Ok(decoded
        .iter()
        .filter(|profile| profile.payload.has_extension_point(extension_point))
        .map(Candidate::from_decoded)
        .collect())
}
