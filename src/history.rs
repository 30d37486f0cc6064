//! Aggregates over a subject's saved reports.

use phenotyper_vision::measure::{round_to, BASE_SEGMENTS};
use phenotyper_vision::{Measurement, Phenotype};

use crate::storage::ReportRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub analyses: usize,
    /// Analyses in which a face was found.
    pub detected: usize,
    /// Mean of each base measurement over detected analyses, in wire order.
    pub means: Vec<Measurement>,
    pub latest: Option<Phenotype>,
}

pub fn summarize(records: &[ReportRecord]) -> HistorySummary {
    let phenotypes: Vec<&Phenotype> = records.iter().filter_map(|r| r.report.phenotype()).collect();

    let means = BASE_SEGMENTS
        .iter()
        .filter_map(|segment| {
            let values: Vec<f64> = phenotypes
                .iter()
                .flat_map(|p| &p.measurements)
                .filter(|m| m.label == segment.label)
                .map(|m| m.value)
                .collect();
            if values.is_empty() {
                return None;
            }
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            Some(Measurement {
                label: segment.label.to_string(),
                value: round_to(mean, 4),
            })
        })
        .collect();

    HistorySummary {
        analyses: records.len(),
        detected: phenotypes.len(),
        means,
        latest: phenotypes.last().map(|p| (*p).clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phenotyper_vision::{ImageDimensions, LandmarkSet, MeasurementReport, Point};

    /// Mesh whose reference segment spans 0.2 of the frame height and whose
    /// face width spans `width` of the frame width.
    fn record_with_face_width(width: f64) -> ReportRecord {
        let mut points = vec![Point::new(0.5, 0.5); 468];
        points[9] = Point::new(0.5, 0.3);
        points[152] = Point::new(0.5, 0.5);
        points[137] = Point::new(0.5 - width / 2.0, 0.4);
        points[366] = Point::new(0.5 + width / 2.0, 0.4);
        let set = LandmarkSet::new(points).unwrap();
        let report = MeasurementReport::from_detection(Some(&set), ImageDimensions::new(1000, 1000));
        ReportRecord::new(format!("face-{width}"), report)
    }

    #[test]
    fn empty_history() {
        let summary = summarize(&[]);
        assert_eq!(summary.analyses, 0);
        assert_eq!(summary.detected, 0);
        assert!(summary.means.is_empty());
        assert!(summary.latest.is_none());
    }

    #[test]
    fn failed_reports_count_but_do_not_contribute() {
        let records = vec![
            record_with_face_width(0.1),
            ReportRecord::new("blank.jpg", MeasurementReport::face_not_detected()),
            record_with_face_width(0.3),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.analyses, 3);
        assert_eq!(summary.detected, 2);

        let labels: Vec<_> = summary.means.iter().map(|m| m.label.as_str()).collect();
        let expected: Vec<_> = BASE_SEGMENTS.iter().map(|s| s.label).collect();
        assert_eq!(labels, expected);

        assert_eq!(summary.means[0].value, 1.0);
        // widths normalize to 0.5 and 1.5
        assert_eq!(summary.means[1].value, 1.0);
    }

    #[test]
    fn latest_is_last_detected() {
        let records = vec![
            record_with_face_width(0.1),
            record_with_face_width(0.3),
            ReportRecord::new("blank.jpg", MeasurementReport::face_not_detected()),
        ];
        let latest = summarize(&records).latest.unwrap();
        assert_eq!(latest.measurements[1].value, 1.5);
    }

    #[test]
    fn only_failures() {
        let records = vec![ReportRecord::new("blank.jpg", MeasurementReport::face_not_detected())];
        let summary = summarize(&records);
        assert_eq!(summary.analyses, 1);
        assert_eq!(summary.detected, 0);
        assert!(summary.means.is_empty());
    }
}
