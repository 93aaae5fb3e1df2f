mod decoder;
mod envfile;
mod payload;
mod scan;

pub use decoder::{CmsDecoder, ProfileDecoder, DEFAULT_DECODE_TIMEOUT, SECURITY_TOOL};
pub use envfile::{render_env_file, sh_quote};
pub use payload::{ProfileKind, ProfilePayload, EXTENSION_POINTS_KEY};
pub use scan::{
    decode_installed_profiles, installed_profiles_dir, scan_candidates, Candidate, DecodedProfile,
    PROFILE_EXTENSION, SAFARI_WEB_EXTENSION,
};

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("HOME is not set, cannot locate installed profiles")]
    HomeMissing,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
