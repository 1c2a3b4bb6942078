//! Page rendering
//!
//! Turns a [`PageState`] into the text the CLI prints.

use crate::client::AddressBook;
use crate::identity::UserKey;
use crate::view::ListView;

use super::PageState;

/// Native multipart upload form. Submitting it is a plain POST; the page
/// does not follow what happens next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub action: String,
    pub method: &'static str,
    pub enctype: &'static str,
    pub field: &'static str,
}

impl UploadForm {
    pub fn for_key(routes: &AddressBook, key: &UserKey) -> Self {
        Self {
            action: routes.upload_ecg(key.as_str()),
            method: "post",
            enctype: "multipart/form-data",
            field: "file",
        }
    }

    pub fn render(&self) -> String {
        format!(
            "Upload: {} {} ({}, field \"{}\")",
            self.method.to_uppercase(),
            self.action,
            self.enctype,
            self.field
        )
    }
}

/// Render the whole page
pub fn render_page(state: &PageState, routes: &AddressBook) -> String {
    let key = match state {
        PageState::KeyLoading => return "Loading...\n".to_string(),
        PageState::KeyAbsent => return "No userKey found\n".to_string(),
        _ => match state.key() {
            Some(key) => key,
            None => return String::new(),
        },
    };

    let mut out = format!("ECG - for {}\n", key);
    out.push_str(&UploadForm::for_key(routes, key).render());
    out.push_str("\n\n");
    out.push_str(&render_list(state));
    out
}

fn render_list(state: &PageState) -> String {
    match state {
        PageState::ListLoading { .. } => "Loading...\n".to_string(),
        PageState::ListError { .. } => "Error\n".to_string(),
        PageState::ListEmpty { .. } => "No ECGs found\n".to_string(),
        PageState::Ready {
            records, selected, ..
        } => {
            let mut out = String::new();
            if let Some(record) = state.selected_record() {
                out.push_str(&record.values_literal());
                out.push('\n');
            }
            out.push_str(&ListView::new(records, selected.as_deref()).render());
            out
        }
        PageState::KeyLoading | PageState::KeyAbsent => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::EcgRecord;

    fn key() -> UserKey {
        UserKey::new("abc").unwrap()
    }

    fn routes() -> AddressBook {
        AddressBook::new("http://backend")
    }

    #[test]
    fn test_key_states() {
        assert_eq!(render_page(&PageState::KeyLoading, &routes()), "Loading...\n");
        assert_eq!(
            render_page(&PageState::KeyAbsent, &routes()),
            "No userKey found\n"
        );
    }

    #[test]
    fn test_header_and_upload_form() {
        let text = render_page(&PageState::ListEmpty { key: key() }, &routes());

        assert!(text.starts_with("ECG - for abc\n"));
        assert!(text.contains(
            "Upload: POST http://backend/api/upload/ecgs/abc (multipart/form-data, field \"file\")"
        ));
        assert!(text.ends_with("No ECGs found\n"));
    }

    #[test]
    fn test_list_error_and_loading() {
        let error = render_page(&PageState::ListError { key: key() }, &routes());
        assert!(error.ends_with("\nError\n"));

        let loading = render_page(
            &PageState::ListLoading {
                key: key(),
                selected: None,
            },
            &routes(),
        );
        assert!(loading.ends_with("\nLoading...\n"));
    }

    #[test]
    fn test_selected_values_are_dumped() {
        let records = vec![
            EcgRecord::new("rec1", "2024-01-01").values([1u64, 2, 3]),
            EcgRecord::new("rec2", "2024-01-02").values([9u64]),
        ];
        let state = PageState::Ready {
            key: key(),
            records: records.clone(),
            selected: Some("rec1".to_string()),
        };

        let text = render_page(&state, &routes());
        assert!(text.contains("[1,2,3]\n"));
        assert!(!text.contains("[9]"));

        let stale = PageState::Ready {
            key: key(),
            records,
            selected: Some("gone".to_string()),
        };
        let text = render_page(&stale, &routes());
        assert!(!text.contains('['));
        assert!(text.ends_with("gone\n"));
    }

    #[test]
    fn test_upload_form_fields() {
        let form = UploadForm::for_key(&routes(), &key());
        assert_eq!(form.action, "http://backend/api/upload/ecgs/abc");
        assert_eq!(form.method, "post");
        assert_eq!(form.enctype, "multipart/form-data");
        assert_eq!(form.field, "file");
    }
}
