/// Where the API key travels on the upstream request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyPlacement {
    /// `X-goog-api-key: <key>`
    #[default]
    GoogApiKey,
    /// `Authorization: Bearer <key>`
    Bearer,
}

impl KeyPlacement {
    /// Interpret the key-header setting: `AUTHORIZATION` (any case) selects
    /// bearer auth, anything else (or nothing) the Google API key header.
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting {
            Some(s) if s.trim().eq_ignore_ascii_case("authorization") => Self::Bearer,
            _ => Self::GoogApiKey,
        }
    }

    /// Header name and value carrying `key`.
    pub fn header(&self, key: &str) -> (&'static str, String) {
        match self {
            Self::GoogApiKey => ("x-goog-api-key", key.to_string()),
            Self::Bearer => ("authorization", format!("Bearer {key}")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogApiKey => "x-goog-api-key",
            Self::Bearer => "bearer",
        }
    }
}
