//! API Address Book
//!
//! Pure mapping from backend operation to URL. Keys are not validated here;
//! an empty key still yields a well-formed URL and the backend decides.

use urlencoding::encode;

/// Default backend address
pub const DEFAULT_API_BASE: &str = "http://test.marc-julian.de";

/// Builds backend URLs from a base address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBook {
    base: String,
}

impl AddressBook {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        // Normalize: remove trailing slash
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `GET` - all ECG recordings for a user
    pub fn ecgs(&self, user_key: &str) -> String {
        format!("{}/api/ecgs/{}", self.base, encode(user_key))
    }

    /// `POST` multipart - upload target for a user's recordings
    pub fn upload_ecg(&self, user_key: &str) -> String {
        format!("{}/api/upload/ecgs/{}", self.base, encode(user_key))
    }

    /// `GET` - issue a fresh user key
    pub fn user_key(&self) -> String {
        format!("{}/api/userkey", self.base)
    }

    /// `GET` - rendered plot of one recording
    pub fn ecg_image(&self, user_key: &str, ecg_name: &str) -> String {
        format!(
            "{}/api/ecg/image/{}/{}",
            self.base,
            encode(user_key),
            encode(ecg_name)
        )
    }
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let routes = AddressBook::new("http://127.0.0.1:5000");
        assert_eq!(routes.ecgs("abc"), "http://127.0.0.1:5000/api/ecgs/abc");
        assert_eq!(
            routes.upload_ecg("abc"),
            "http://127.0.0.1:5000/api/upload/ecgs/abc"
        );
        assert_eq!(routes.user_key(), "http://127.0.0.1:5000/api/userkey");
        assert_eq!(
            routes.ecg_image("abc", "ecg_1"),
            "http://127.0.0.1:5000/api/ecg/image/abc/ecg_1"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let routes = AddressBook::new("http://localhost:5000//");
        assert_eq!(routes.base(), "http://localhost:5000");
        assert_eq!(routes.user_key(), "http://localhost:5000/api/userkey");
    }

    #[test]
    fn test_empty_key_still_builds_url() {
        let routes = AddressBook::default();
        assert_eq!(routes.ecgs(""), "http://test.marc-julian.de/api/ecgs/");
    }

    #[test]
    fn test_path_segments_are_encoded() {
        let routes = AddressBook::default();
        assert_eq!(
            routes.ecg_image("k", "ecg 2024/01"),
            "http://test.marc-julian.de/api/ecg/image/k/ecg%202024%2F01"
        );
    }
}
