use serde::{Deserialize, Serialize};

/// Current conditions as returned by the weather service's `/weather` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub main: MainReadings,
    pub wind: Wind,
    pub sys: Option<LocationInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationInfo {
    pub country: Option<String>,
}

impl CurrentWeather {
    /// "Paris, FR" or just "Paris"
    pub fn location(&self) -> String {
        match self.sys.as_ref().and_then(|sys| sys.country.as_deref()) {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }

    pub fn summary(&self) -> String {
        self.weather
            .first()
            .map(|condition| capitalize(&condition.description))
            .unwrap_or_else(|| "No description".to_string())
    }

    pub fn icon_url(&self) -> Option<String> {
        self.weather
            .first()
            .map(|condition| format!("https://openweathermap.org/img/wn/{}@2x.png", condition.icon))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
