/// Display languages supported by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Pl,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pl => "pl",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Pl,
            Language::Pl => Language::En,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Language::En => "Health Counters",
            Language::Pl => "Liczniki Zdrowia",
        }
    }

    /// Picks the initial language from an `Accept-Language` style list.
    ///
    /// Entries are ordered by their `q` weight (stable for ties) and the
    /// first one naming English or Polish wins. Anything else means English.
    pub fn detect(preferences: &str) -> Self {
        let mut ranked: Vec<(&str, f32)> = preferences
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let tag = parts.next()?.trim();
                if tag.is_empty() {
                    return None;
                }
                let weight = parts
                    .filter_map(|param| param.trim().strip_prefix("q="))
                    .find_map(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((tag, weight))
            })
            .filter(|(_, weight)| *weight > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .find_map(|(tag, _)| Self::from_tag(tag))
            .unwrap_or_default()
    }

    fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "pl" => Some(Language::Pl),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

/// Per-view UI state; the browser script keeps the same shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    pub language: Language,
}

impl UiState {
    pub fn detected(preferences: &str) -> Self {
        Self {
            language: Language::detect(preferences),
        }
    }

    pub fn toggle(&mut self) {
        self.language = self.language.toggled();
    }
}
