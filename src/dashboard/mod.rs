//! Dashboard view model: the latest-value widgets and the temperature /
//! humidity time series, derived from the full reading list.

pub mod client;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::dto::SensorReadingDto;

pub const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text shown while no reading is available.
pub const LOADING: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardView {
    /// Newest reading, `None` until at least one reading exists.
    pub latest: Option<LatestWidgets>,
    pub chart: ChartSeries,
}

/// Values of the newest reading, flags rendered as display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatestWidgets {
    pub temperature: f64,
    pub humidity: f64,
    pub water: String,
    pub motion: String,
    pub fire: String,
    pub servo: String,
    pub recorded_at: DateTime<Utc>,
}

/// Parallel sequences for a two-series line chart. All three vectors have
/// the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
}

impl DashboardView {
    pub fn from_readings(readings: &[SensorReadingDto]) -> Self {
        let mut ordered: Vec<&SensorReadingDto> = readings.iter().collect();
        ordered.sort_by_key(|r| r.created_at);

        let chart = ChartSeries {
            labels: ordered
                .iter()
                .map(|r| r.created_at.format(LABEL_FORMAT).to_string())
                .collect(),
            temperature: ordered.iter().map(|r| r.temperature).collect(),
            humidity: ordered.iter().map(|r| r.humidity).collect(),
        };

        Self {
            latest: ordered.last().map(|r| LatestWidgets::from(*r)),
            chart,
        }
    }
}

impl From<&SensorReadingDto> for LatestWidgets {
    fn from(r: &SensorReadingDto) -> Self {
        Self {
            temperature: r.temperature,
            humidity: r.humidity,
            water: water_label(r.water_sensor).to_owned(),
            motion: motion_label(r.sensor_pir).to_owned(),
            fire: fire_label(r.sensor_api).to_owned(),
            servo: servo_label(r.servo).to_owned(),
            recorded_at: r.created_at,
        }
    }
}

/// Plain-text rendering used by the terminal dashboard.
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::from("Room Monitoring Dashboard\n\n");

    let rows: [(&str, String); 6] = match &view.latest {
        Some(w) => [
            ("Temperature", w.temperature.to_string()),
            ("Humidity", w.humidity.to_string()),
            ("Water Sensor", w.water.clone()),
            ("PIR Sensor", w.motion.clone()),
            ("Fire Sensor", w.fire.clone()),
            ("Servo Status", w.servo.clone()),
        ],
        None => [
            "Temperature",
            "Humidity",
            "Water Sensor",
            "PIR Sensor",
            "Fire Sensor",
            "Servo Status",
        ]
        .map(|name| (name, LOADING.to_owned())),
    };
    for (name, value) in rows {
        out.push_str(&format!("{name:<13} {value}\n"));
    }

    if !view.chart.labels.is_empty() {
        out.push_str(&format!(
            "\n{:<20} {:>12} {:>9}\n",
            "Time", "Temperature", "Humidity"
        ));
        let series = view
            .chart
            .labels
            .iter()
            .zip(&view.chart.temperature)
            .zip(&view.chart.humidity);
        for ((label, temperature), humidity) in series {
            out.push_str(&format!("{label:<20} {temperature:>12} {humidity:>9}\n"));
        }
    }

    out
}

pub fn water_label(detected: bool) -> &'static str {
    if detected { "Detected" } else { "Not Detected" }
}

pub fn motion_label(detected: bool) -> &'static str {
    if detected { "Motion Detected" } else { "No Motion" }
}

pub fn fire_label(detected: bool) -> &'static str {
    if detected { "Fire Detected" } else { "No Fire" }
}

pub fn servo_label(closed: bool) -> &'static str {
    if closed { "Closed" } else { "Locked" }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    use super::*;

    fn dto(minute: i64, temperature: f64, humidity: f64, flags: bool) -> SensorReadingDto {
        SensorReadingDto {
            id: Uuid::new_v4(),
            temperature,
            humidity,
            water_sensor: flags,
            sensor_pir: flags,
            sensor_api: flags,
            servo: flags,
            created_at: Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
                + Duration::minutes(minute),
        }
    }

    #[test]
    fn empty_readings_give_loading_state() {
        let view = DashboardView::from_readings(&[]);
        assert!(view.latest.is_none());
        assert_eq!(view.chart, ChartSeries::default());
    }

    #[test]
    fn latest_is_newest_by_timestamp() {
        let readings = vec![dto(5, 30.0, 40.0, true), dto(0, 20.0, 50.0, false)];
        let view = DashboardView::from_readings(&readings);
        let latest = view.latest.unwrap();
        assert_eq!(latest.temperature, 30.0);
        assert_eq!(latest.recorded_at, readings[0].created_at);
    }

    #[test]
    fn flags_map_to_display_text() {
        let on = LatestWidgets::from(&dto(0, 0.0, 0.0, true));
        assert_eq!(on.water, "Detected");
        assert_eq!(on.motion, "Motion Detected");
        assert_eq!(on.fire, "Fire Detected");
        assert_eq!(on.servo, "Closed");

        let off = LatestWidgets::from(&dto(0, 0.0, 0.0, false));
        assert_eq!(off.water, "Not Detected");
        assert_eq!(off.motion, "No Motion");
        assert_eq!(off.fire, "No Fire");
        assert_eq!(off.servo, "Locked");
    }

    #[test]
    fn render_text_shows_loading_without_readings() {
        let text = render_text(&DashboardView::from_readings(&[]));
        assert!(text.contains("Temperature   Loading..."));
        assert!(text.contains("Servo Status  Loading..."));
        assert!(!text.contains("Time"));
    }

    #[test]
    fn render_text_layout_is_exact() {
        let text = render_text(&DashboardView::from_readings(&[dto(0, 20.5, 45.0, true)]));
        let expected = "Room Monitoring Dashboard\n\
                        \n\
                        Temperature   20.5\n\
                        Humidity      45\n\
                        Water Sensor  Detected\n\
                        PIR Sensor    Motion Detected\n\
                        Fire Sensor   Fire Detected\n\
                        Servo Status  Closed\n\
                        \n\
                        Time                  Temperature  Humidity\n\
                        2024-03-10 09:00:00          20.5        45\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn render_text_lists_widgets_and_series() {
        let readings = vec![dto(0, 20.5, 45.0, false), dto(1, 21.0, 46.0, true)];
        let text = render_text(&DashboardView::from_readings(&readings));
        assert!(text.contains("Temperature   21"));
        assert!(text.contains("Fire Sensor   Fire Detected"));
        assert!(text.contains("2024-03-10 09:00:00"));
        assert!(text.contains("20.5"));
    }

    #[test]
    fn chart_series_are_chronological_and_parallel() {
        let readings = vec![
            dto(2, 22.0, 52.0, false),
            dto(0, 20.0, 50.0, false),
            dto(1, 21.0, 51.0, false),
        ];
        let chart = DashboardView::from_readings(&readings).chart;
        assert_eq!(
            chart.labels,
            vec!["2024-03-10 09:00:00", "2024-03-10 09:01:00", "2024-03-10 09:02:00"]
        );
        assert_eq!(chart.temperature, vec![20.0, 21.0, 22.0]);
        assert_eq!(chart.humidity, vec![50.0, 51.0, 52.0]);
    }
}
