use serde::Deserialize;

/// Request body for creating a bookmark.
#[derive(Debug, Deserialize)]
pub struct CreateBookmarkRequest {
    pub title: String,
    pub description: Option<String>,
    pub link: String,
}

/// Partial bookmark update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct EditBookmarkRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_description_is_optional() {
        let body: CreateBookmarkRequest =
            serde_json::from_str(r#"{"title":"t","link":"https://e.com"}"#).unwrap();
        assert_eq!(body.title, "t");
        assert_eq!(body.link, "https://e.com");
        assert!(body.description.is_none());
    }

    #[test]
    fn edit_request_accepts_any_subset() {
        let body: EditBookmarkRequest = serde_json::from_str(r#"{"title":"new"}"#).unwrap();
        assert_eq!(body.title.as_deref(), Some("new"));
        assert!(body.description.is_none());
        assert!(body.link.is_none());
    }
}
