//! Upload directories for image fields.
//!
//! Image columns store a path relative to the media root, e.g.
//! `property_images/front.jpg`. Writing the file itself is left to the caller.

use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UploadDir {
    CustomerProfiles,
    AgentProfile,
    PropertyImages,
}

impl UploadDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadDir::CustomerProfiles => "customer_profiles",
            UploadDir::AgentProfile => "Agent_profile",
            UploadDir::PropertyImages => "property_images",
        }
    }

    /// Relative path stored in the database for `file`. Paths already
    /// inside this directory are kept as they are.
    pub fn stored_path(&self, file: &str) -> String {
        let file = file.trim().trim_start_matches('/');
        let prefix = format!("{}/", self.as_str());
        if file.starts_with(&prefix) {
            file.to_string()
        } else {
            format!("{}{}", prefix, file)
        }
    }

    /// Absolute location of a stored path under `media_root`.
    pub fn resolve(media_root: &Path, stored: &str) -> PathBuf {
        media_root.join(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_bare_file_names() {
        assert_eq!(
            UploadDir::PropertyImages.stored_path("front.jpg"),
            "property_images/front.jpg"
        );
        assert_eq!(
            UploadDir::AgentProfile.stored_path("/jane.png"),
            "Agent_profile/jane.png"
        );
    }

    #[test]
    fn keeps_already_prefixed_paths() {
        assert_eq!(
            UploadDir::CustomerProfiles.stored_path("customer_profiles/a.png"),
            "customer_profiles/a.png"
        );
    }

    #[test]
    fn resolves_under_media_root() {
        let path = UploadDir::resolve(Path::new("/srv/media"), "property_images/a.jpg");
        assert_eq!(path, PathBuf::from("/srv/media/property_images/a.jpg"));
    }
}
