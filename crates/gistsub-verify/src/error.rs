/// Why fetched content was refused.
///
/// The [`reason`](Rejection::reason) string is stable: it is written verbatim
/// to the status document and to the event stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("response is an HTML page")]
    HtmlResponse,

    #[error("content is empty")]
    Empty,

    #[error("content exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("content is not valid UTF-8")]
    NotUtf8,

    #[error("content is not valid YAML: {0}")]
    YamlParse(String),

    #[error("top-level YAML value is not a mapping")]
    NotMapping,

    #[error("required key '{0}' is missing")]
    MissingKey(String),
}

impl Rejection {
    pub fn reason(&self) -> String {
        match self {
            Rejection::HtmlResponse => "html_response".to_string(),
            Rejection::Empty => "empty_content".to_string(),
            Rejection::TooLarge { .. } => "too_large".to_string(),
            Rejection::NotUtf8 => "not_utf8".to_string(),
            Rejection::YamlParse(_) => "yaml_parse_error".to_string(),
            Rejection::NotMapping => "yaml_not_mapping".to_string(),
            Rejection::MissingKey(key) => format!("missing_key:{key}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Rejection>;
