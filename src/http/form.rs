//! Form value extraction
//!
//! Merges `application/x-www-form-urlencoded` or `multipart/form-data` bodies
//! with URL query values. The first occurrence of a key wins and body values
//! are read before the query.

use hyper::body::Bytes;
use std::collections::HashMap;
use std::convert::Infallible;
use url::form_urlencoded;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

#[derive(Debug, Default, Clone)]
pub struct FormValues {
    values: HashMap<String, String>,
}

impl FormValues {
    /// Collect form values from a request.
    ///
    /// The body only counts when the content type is one of the two form
    /// encodings; any other body is ignored. File parts of a multipart body
    /// are skipped.
    pub async fn decode(
        content_type: Option<&str>,
        body: Bytes,
        query: Option<&str>,
    ) -> Result<Self, multer::Error> {
        let mut form = Self::default();
        if let Some(content_type) = content_type {
            let media = media_type(content_type);
            if media.eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
                form.merge_urlencoded(&body);
            } else if media.eq_ignore_ascii_case(MULTIPART_CONTENT_TYPE) {
                let boundary = multer::parse_boundary(content_type)?;
                form.merge_multipart(body, boundary).await?;
            }
        }
        if let Some(q) = query {
            form.merge_urlencoded(q.as_bytes());
        }
        Ok(form)
    }

    fn merge_urlencoded(&mut self, encoded: &[u8]) {
        for (key, value) in form_urlencoded::parse(encoded) {
            self.insert(key.into_owned(), value.into_owned());
        }
    }

    async fn merge_multipart(&mut self, body: Bytes, boundary: String) -> Result<(), multer::Error> {
        let stream = futures_util::stream::iter([Ok::<_, Infallible>(body)]);
        let mut multipart = multer::Multipart::new(stream, boundary);
        while let Some(field) = multipart.next_field().await? {
            if field.file_name().is_some() {
                continue;
            }
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };
            let value = field.text().await?;
            self.insert(name, value);
        }
        Ok(())
    }

    fn insert(&mut self, key: String, value: String) {
        self.values.entry(key).or_insert(value);
    }

    /// Value for `key`, or the empty string when absent
    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }
}

/// Media type without parameters such as `charset` or `boundary`
fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn decode(content_type: Option<&str>, body: &'static [u8], query: Option<&str>) -> FormValues {
        FormValues::decode(content_type, Bytes::from_static(body), query)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_decodes_body() {
        let form = decode(
            Some(FORM_CONTENT_TYPE),
            b"name=Dune&author=Frank+Herbert&publication_date=1965%2F08",
            None,
        )
        .await;
        assert_eq!(form.value("name"), "Dune");
        assert_eq!(form.value("author"), "Frank Herbert");
        assert_eq!(form.value("publication_date"), "1965/08");
        assert_eq!(form.value("missing"), "");
    }

    #[tokio::test]
    async fn test_body_wins_over_query() {
        let form = decode(
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
            b"name=FromBody",
            Some("name=FromQuery&author=QueryOnly"),
        )
        .await;
        assert_eq!(form.value("name"), "FromBody");
        assert_eq!(form.value("author"), "QueryOnly");
    }

    #[tokio::test]
    async fn test_first_value_wins() {
        let form = decode(Some(FORM_CONTENT_TYPE), b"name=a&name=b", None).await;
        assert_eq!(form.value("name"), "a");
    }

    #[tokio::test]
    async fn test_decodes_multipart_fields() {
        let body = b"--XYZ\r\n\
Content-Disposition: form-data; name=\"name\"\r\n\r\n\
Dune\r\n\
--XYZ\r\n\
Content-Disposition: form-data; name=\"cover\"; filename=\"dune.png\"\r\n\
Content-Type: image/png\r\n\r\n\
PNG\r\n\
--XYZ\r\n\
Content-Disposition: form-data; name=\"author\"\r\n\r\n\
Frank Herbert\r\n\
--XYZ--\r\n";
        let form = decode(
            Some("multipart/form-data; boundary=XYZ"),
            body,
            Some("name=FromQuery&publication_date=1965"),
        )
        .await;
        assert_eq!(form.value("name"), "Dune");
        assert_eq!(form.value("author"), "Frank Herbert");
        assert_eq!(form.value("publication_date"), "1965");
        assert_eq!(form.value("cover"), "");
    }

    #[tokio::test]
    async fn test_multipart_without_boundary_fails() {
        let result = FormValues::decode(
            Some(MULTIPART_CONTENT_TYPE),
            Bytes::from_static(b"name=Dune"),
            None,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ignores_non_form_body() {
        let form = decode(
            Some("application/json"),
            br#"{"name":"Dune"}"#,
            Some("author=Herbert"),
        )
        .await;
        assert_eq!(form.value("name"), "");
        assert_eq!(form.value("author"), "Herbert");

        let form = decode(None, b"name=Dune", None).await;
        assert_eq!(form.value("name"), "");
    }
}
