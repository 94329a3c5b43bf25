use pulsegate_core::error::Result;

use super::{RawBody, Relay, Upstream};

// Array params go out as repeated `key[]=` pairs.
const FIELDS: [&str; 2] = ["temperature", "precipitation"];
const TIMESTEPS: [&str; 1] = ["1h"];
const UNITS: &str = "metric";

impl Relay {
    /// Hourly temperature and precipitation timelines for `location`.
    pub async fn fetch_weather(&self, location: &str) -> Result<RawBody> {
        let key = self.require_key(Upstream::Weather, &self.credentials.tomorrow_api_key)?;

        let mut query: Vec<(&str, &str)> = vec![("location", location)];
        query.extend(FIELDS.iter().map(|f| ("fields[]", *f)));
        query.extend(TIMESTEPS.iter().map(|t| ("timesteps[]", *t)));
        query.push(("units", UNITS));
        query.push(("apikey", key));

        let req = self.http.get(&self.upstreams.weather_url).query(&query);

        self.send(Upstream::Weather, req).await
    }
}
