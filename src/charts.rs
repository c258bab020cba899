use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use crate::aggregate::BREAKDOWN_METRICS;
use crate::models::{RatingMetric, Scope, WeeklyAggregate};

pub const BREAKDOWN_TITLES: [&str; 4] = [
    "Office Culture",
    "WFH Environment",
    "Working Relationships",
    "Work Roles",
];

const BREAKDOWN_BASE_COLOR: &str = "#000000";
const BREAKDOWN_COLORS: [&str; 4] = ["#99ccff", "#ace600", "#ffe6ff", "#cc99ff"];

const PRODUCTIVITY_COLOR: &str = "#2d5986";
const LONELINESS_COLOR: &str = "#00b3b3";
const CONNECTION_COLOR: &str = "#9fbfdf";
const MARKER_OUTLINE: &str = "#ffffff";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub productivity_label: String,
    pub dates: Vec<NaiveDate>,
    pub productivity: Vec<u32>,
    pub connections: Vec<u32>,
    pub loneliness: Vec<u32>,
    pub home_days: Vec<u32>,
    pub hover_text: Vec<String>,
    pub size_ref: f64,
}

impl TimeSeries {
    pub fn from_rows(scope: &Scope, rows: &[&WeeklyAggregate], size_ref: f64) -> Self {
        let productivity_label = match scope {
            Scope::Company => "<b>Company</b> Productivity",
            Scope::Team(_) => "<b>Team</b> Productivity",
        };

        Self {
            productivity_label: productivity_label.to_string(),
            dates: rows.iter().map(|r| r.date).collect(),
            productivity: rows.iter().map(|r| r.rating(RatingMetric::Productivity)).collect(),
            connections: rows.iter().map(|r| r.rating(RatingMetric::Connections)).collect(),
            loneliness: rows.iter().map(|r| r.rating(RatingMetric::Loneliness)).collect(),
            home_days: rows.iter().map(|r| r.home_days).collect(),
            hover_text: rows.iter().map(|r| r.summary_text.clone()).collect(),
            size_ref,
        }
    }

    /// Loneliness on the top subplot, productivity and connection below.
    pub fn to_plotly(&self) -> Value {
        let home_text: Vec<String> = self
            .home_days
            .iter()
            .map(|days| format!("{days} WFH days"))
            .collect();

        let productivity = json!({
            "type": "scatter",
            "x": self.dates,
            "y": self.productivity,
            "mode": "lines+markers",
            "text": self.hover_text,
            "line": { "width": 3, "color": PRODUCTIVITY_COLOR },
            "marker": { "size": 10, "line": { "color": MARKER_OUTLINE, "width": 1 } },
            "name": self.productivity_label,
            "xaxis": "x2",
            "yaxis": "y2",
        });
        let connections = json!({
            "type": "bar",
            "x": self.dates,
            "y": self.connections,
            "opacity": 0.8,
            "name": "Team Connection",
            "marker": { "color": CONNECTION_COLOR, "line": { "color": MARKER_OUTLINE, "width": 1 } },
            "xaxis": "x2",
            "yaxis": "y2",
        });
        let loneliness = json!({
            "type": "scatter",
            "x": self.dates,
            "y": self.loneliness,
            "mode": "lines+markers",
            "text": home_text,
            "marker": { "size": self.home_days, "sizeref": self.size_ref, "color": LONELINESS_COLOR },
            "name": "Loneliness",
            "xaxis": "x",
            "yaxis": "y",
        });

        let percent_axis = |anchor: &str, domain: [f64; 2]| {
            json!({
                "anchor": anchor,
                "domain": domain,
                "range": [0, 100],
                "side": "right",
                "type": "linear",
                "zeroline": false,
            })
        };

        json!({
            "data": [productivity, connections, loneliness],
            "layout": {
                "legend": { "orientation": "h", "x": 0, "y": 1.1 },
                "hovermode": "closest",
                "autosize": true,
                "width": 1200,
                "height": 600,
                "font": { "size": 16 },
                "xaxis": { "anchor": "y", "domain": [0.0, 1.0], "matches": "x2", "showticklabels": false },
                "xaxis2": { "anchor": "y2", "domain": [0.0, 1.0] },
                "yaxis": percent_axis("x", [0.54, 1.0]),
                "yaxis2": percent_axis("x2", [0.0, 0.46]),
            },
        })
    }
}

/// One satisfaction donut: the mode value out of 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub title: &'static str,
    pub metric: RatingMetric,
    pub value: Option<u32>,
    pub color: &'static str,
}

impl Breakdown {
    pub fn all(values: [Option<u32>; 4]) -> Vec<Self> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Self {
                title: BREAKDOWN_TITLES[i],
                metric: BREAKDOWN_METRICS[i],
                value,
                color: BREAKDOWN_COLORS[i],
            })
            .collect()
    }

    pub fn to_plotly(&self) -> Value {
        let data = match self.value {
            Some(value) => {
                let label = value.to_string();
                json!([{
                    "type": "sunburst",
                    "ids": [label.clone(), format!("{label}/ ")],
                    "labels": [label.clone(), " "],
                    "parents": ["", label],
                    "values": [100, value],
                    "branchvalues": "total",
                    "marker": { "colors": [BREAKDOWN_BASE_COLOR, self.color] },
                    "textfont": { "size": 50, "color": self.color },
                }])
            }
            None => json!([]),
        };

        json!({
            "data": data,
            "layout": {
                "height": 200,
                "margin": { "l": 20, "r": 20, "t": 20, "b": 20 },
            },
        })
    }
}

/// Everything one recompute hands to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub time_series: TimeSeries,
    pub breakdowns: Vec<Breakdown>,
}

impl ChartData {
    pub fn to_plotly(&self) -> Value {
        let breakdowns: Vec<Value> = self.breakdowns.iter().map(Breakdown::to_plotly).collect();
        json!({
            "plot": self.time_series.to_plotly(),
            "breakdowns": breakdowns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;
    use crate::dataset::tests::sample_dataset;

    #[test]
    fn series_follow_rows() {
        let dataset = sample_dataset();
        let rows: Vec<&WeeklyAggregate> = dataset.company().iter().take(3).collect();
        let series = TimeSeries::from_rows(&Scope::Company, &rows, dataset.size_ref());
        assert_eq!(series.dates.len(), 3);
        assert_eq!(series.productivity, vec![20, 40, 60]);
        assert_eq!(series.connections, vec![60, 60, 60]);
        assert_eq!(series.productivity_label, "<b>Company</b> Productivity");
        assert_eq!(series.hover_text[0], rows[0].summary_text);
    }

    #[test]
    fn team_series_is_labelled_as_team() {
        let series = TimeSeries::from_rows(&Scope::Team("Sales".to_string()), &[], 1.0);
        assert_eq!(series.productivity_label, "<b>Team</b> Productivity");
        let figure = series.to_plotly();
        assert_eq!(figure["data"].as_array().unwrap().len(), 3);
        assert_eq!(figure["data"][0]["x"], json!([]));
    }

    #[test]
    fn plot_layout_uses_percent_axes() {
        let series = TimeSeries::from_rows(&Scope::Company, &[], 1.0);
        let figure = series.to_plotly();
        assert_eq!(figure["layout"]["yaxis"]["range"], json!([0, 100]));
        assert_eq!(figure["layout"]["yaxis2"]["side"], "right");
        assert_eq!(figure["layout"]["legend"]["orientation"], "h");
    }

    #[test]
    fn loneliness_markers_scale_with_home_days() {
        let dataset = sample_dataset();
        let rows: Vec<&WeeklyAggregate> = dataset.company().iter().take(2).collect();
        let figure = TimeSeries::from_rows(&Scope::Company, &rows, 0.08).to_plotly();
        let trace = &figure["data"][2];
        assert_eq!(trace["marker"]["size"], json!([1, 2]));
        assert_eq!(trace["text"], json!(["1 WFH days", "2 WFH days"]));
    }

    #[test]
    fn donut_shows_value_out_of_hundred() {
        let breakdowns = Breakdown::all([Some(80), Some(60), None, Some(0)]);
        assert_eq!(breakdowns[0].title, "Office Culture");
        let figure = breakdowns[0].to_plotly();
        assert_eq!(figure["data"][0]["values"], json!([100, 80]));
        assert_eq!(figure["data"][0]["labels"], json!(["80", " "]));
        assert_eq!(figure["data"][0]["marker"]["colors"], json!(["#000000", "#99ccff"]));
    }

    #[test]
    fn empty_donut_has_no_traces() {
        let values = aggregate::breakdown_modes(&[]);
        let breakdowns = Breakdown::all(values);
        for breakdown in &breakdowns {
            assert_eq!(breakdown.to_plotly()["data"], json!([]));
        }
    }
}
