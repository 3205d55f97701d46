//! Query parameters and URL construction

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::transcode::to_snake_case;

/// A single query-string value
///
/// `Null` entries are dropped when the URL is built rather than sent empty.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl QueryValue {
    /// Renders the value the way it appears in the query string
    ///
    /// Returns `None` for `Null`.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            // f64 Display already drops a trailing ".0"
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Outgoing query-string parameters, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter; a later insert with the same name replaces the value
    pub fn insert(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
        self
    }

    /// Builds parameters from the top-level fields of a serializable struct
    ///
    /// Nested objects and arrays are not representable in a query string and
    /// are rejected.
    pub fn from_serialize<T: Serialize>(params: &T) -> Result<Self, serde_json::Error> {
        use serde::ser::Error as _;

        let Value::Object(map) = serde_json::to_value(params)? else {
            return Err(serde_json::Error::custom("query parameters must serialize to a map"));
        };

        let mut out = Self::new();
        for (name, value) in map {
            let value = match value {
                Value::Null => QueryValue::Null,
                Value::Bool(b) => QueryValue::Bool(b),
                Value::String(s) => QueryValue::String(s),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => QueryValue::Int(i),
                    None => QueryValue::Float(n.as_f64().unwrap_or_default()),
                },
                Value::Array(_) | Value::Object(_) => {
                    return Err(serde_json::Error::custom(format!(
                        "query parameter `{name}` is not a scalar"
                    )))
                }
            };
            out.entries.push((name, value));
        }
        Ok(out)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Resolves `endpoint` against `base` and appends the query string
///
/// The base path is kept (`http://host/api` + `nearby/` gives
/// `http://host/api/nearby/`). Parameter names are converted to snake_case and
/// `Null` values are skipped. No `?` is emitted when nothing remains.
pub fn build_url(
    base: &Url,
    endpoint: &str,
    params: Option<&QueryParams>,
) -> Result<Url, url::ParseError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined)?;

    let rendered: Vec<(String, String)> = params
        .map(|p| {
            p.iter()
                .filter_map(|(k, v)| v.render().map(|v| (to_snake_case(k), v)))
                .collect()
        })
        .unwrap_or_default();

    if !rendered.is_empty() {
        url.query_pairs_mut().extend_pairs(rendered);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8000/api").unwrap()
    }

    #[test]
    fn coordinates_render_as_plain_decimals() {
        let params = QueryParams::new()
            .insert("latitude", -3.75)
            .insert("longitude", -38.5);

        let url = build_url(&base(), "nearby/", Some(&params)).unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/nearby/?latitude=-3.75&longitude=-38.5"
        );
    }

    #[test]
    fn camel_case_keys_become_snake_case() {
        let params = QueryParams::new().insert("priceRange", 10.0);
        let url = build_url(&base(), "nearby/", Some(&params)).unwrap();
        assert_eq!(url.query(), Some("price_range=10"));
    }

    #[test]
    fn null_values_are_omitted() {
        let params = QueryParams::new()
            .insert("a", 1)
            .insert("b", QueryValue::Null)
            .insert("c", None::<i64>);

        let url = build_url(&base(), "x", Some(&params)).unwrap();
        assert_eq!(url.query(), Some("a=1"));
    }

    #[test]
    fn no_query_string_when_everything_is_null() {
        let params = QueryParams::new().insert("b", QueryValue::Null);
        let url = build_url(&base(), "x", Some(&params)).unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.as_str(), "http://localhost:8000/api/x");
    }

    #[test]
    fn slashes_are_normalized_between_base_and_endpoint() {
        let with_slash = Url::parse("http://localhost:8000/api/").unwrap();
        let a = build_url(&with_slash, "/bookings/", None).unwrap();
        let b = build_url(&base(), "bookings/", None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "http://localhost:8000/api/bookings/");
    }

    #[test]
    fn values_are_form_encoded() {
        let params = QueryParams::new()
            .insert("startTime", "2024-05-01T10:00:00+00:00")
            .insert("q", "rua a&b");
        let url = build_url(&base(), "search/", Some(&params)).unwrap();
        assert_eq!(
            url.query(),
            Some("start_time=2024-05-01T10%3A00%3A00%2B00%3A00&q=rua+a%26b")
        );
    }

    #[test]
    fn booleans_render_as_words() {
        let params = QueryParams::new().insert("isActive", true);
        let url = build_url(&base(), "x", Some(&params)).unwrap();
        assert_eq!(url.query(), Some("is_active=true"));
    }

    #[test]
    fn insert_replaces_existing_key() {
        let params = QueryParams::new().insert("limit", 5).insert("limit", 10);
        assert_eq!(params.len(), 1);
        assert_eq!(params.iter().next(), Some(("limit", &QueryValue::Int(10))));
    }

    #[test]
    fn from_serialize_reads_struct_fields_in_order() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Params {
            latitude: f64,
            longitude: f64,
            search_radius: Option<u32>,
            limit: Option<u32>,
        }

        let params = QueryParams::from_serialize(&Params {
            latitude: 1.5,
            longitude: 2.0,
            search_radius: Some(3),
            limit: None,
        })
        .unwrap();

        let url = build_url(&base(), "nearby/", Some(&params)).unwrap();
        assert_eq!(url.query(), Some("latitude=1.5&longitude=2&search_radius=3"));
    }

    #[test]
    fn from_serialize_rejects_nested_values() {
        #[derive(Serialize)]
        struct Bad {
            tags: Vec<String>,
        }

        let result = QueryParams::from_serialize(&Bad { tags: vec![] });
        assert!(result.is_err());
    }
}
