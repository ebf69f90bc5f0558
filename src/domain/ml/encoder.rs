//! One-hot encoding for the categorical pricing features.
//!
//! Categories are learned at fit time, sorted, and the first category of each
//! column is dropped as the reference level. The fitted encoder is persisted
//! with the model; inference must use the exact same instance.

use crate::domain::errors::EncoderError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    /// Reference level, encoded as all zeros
    pub dropped: String,
    /// Levels that get their own output column, in output order
    pub categories: Vec<String>,
}

impl CategoricalColumn {
    fn width(&self) -> usize {
        self.categories.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    columns: Vec<CategoricalColumn>,
}

impl OneHotEncoder {
    /// Learn the category set of each column.
    ///
    /// `rows[i][j]` is the value of column `column_names[j]` in row `i`.
    pub fn fit<S: AsRef<str>>(
        column_names: &[&str],
        rows: &[Vec<S>],
    ) -> Result<Self, EncoderError> {
        let mut seen: Vec<BTreeSet<String>> = vec![BTreeSet::new(); column_names.len()];

        for row in rows {
            if row.len() != column_names.len() {
                return Err(EncoderError::ArityMismatch {
                    expected: column_names.len(),
                    got: row.len(),
                });
            }
            for (set, value) in seen.iter_mut().zip(row) {
                set.insert(value.as_ref().to_string());
            }
        }

        let mut columns = Vec::with_capacity(column_names.len());
        for (name, set) in column_names.iter().zip(seen) {
            let mut levels = set.into_iter();
            let dropped = levels.next().ok_or_else(|| EncoderError::EmptyColumn {
                column: name.to_string(),
            })?;
            columns.push(CategoricalColumn {
                name: name.to_string(),
                dropped,
                categories: levels.collect(),
            });
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[CategoricalColumn] {
        &self.columns
    }

    /// Number of output columns
    pub fn width(&self) -> usize {
        self.columns.iter().map(CategoricalColumn::width).sum()
    }

    /// Output column names as `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .flat_map(|c| {
                c.categories
                    .iter()
                    .map(move |cat| format!("{}_{}", c.name, cat))
            })
            .collect()
    }

    /// Encode one row of categorical values.
    /// Values never seen at fit time encode to all zeros for their column.
    pub fn transform<S: AsRef<str>>(&self, values: &[S]) -> Result<Vec<f64>, EncoderError> {
        if values.len() != self.columns.len() {
            return Err(EncoderError::ArityMismatch {
                expected: self.columns.len(),
                got: values.len(),
            });
        }

        let mut out = Vec::with_capacity(self.width());
        for (column, value) in self.columns.iter().zip(values) {
            let value = value.as_ref();
            out.extend(
                column
                    .categories
                    .iter()
                    .map(|cat| if cat == value { 1.0 } else { 0.0 }),
            );
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> OneHotEncoder {
        let rows = vec![
            vec!["Rain", "Night"],
            vec!["Clear", "Morning"],
            vec!["Clouds", "LunchRush"],
            vec!["Thunderstorm", "Afternoon"],
            vec!["Clear", "DinnerRush"],
        ];
        OneHotEncoder::fit(&["weather_condition", "time_of_day"], &rows).unwrap()
    }

    #[test]
    fn test_fit_sorts_and_drops_first_category() {
        let encoder = fitted();
        let weather = &encoder.columns()[0];
        assert_eq!(weather.dropped, "Clear");
        assert_eq!(weather.categories, vec!["Clouds", "Rain", "Thunderstorm"]);

        let time = &encoder.columns()[1];
        assert_eq!(time.dropped, "Afternoon");
        assert_eq!(
            time.categories,
            vec!["DinnerRush", "LunchRush", "Morning", "Night"]
        );
        assert_eq!(encoder.width(), 7);
    }

    #[test]
    fn test_feature_names_follow_column_order() {
        assert_eq!(
            fitted().feature_names(),
            vec![
                "weather_condition_Clouds",
                "weather_condition_Rain",
                "weather_condition_Thunderstorm",
                "time_of_day_DinnerRush",
                "time_of_day_LunchRush",
                "time_of_day_Morning",
                "time_of_day_Night",
            ]
        );
    }

    #[test]
    fn test_known_category_sets_its_column() {
        let row = fitted().transform(&["Rain", "DinnerRush"]).unwrap();
        assert_eq!(row, vec![0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reference_category_is_all_zero() {
        let row = fitted().transform(&["Clear", "Afternoon"]).unwrap();
        assert!(row.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_unseen_category_is_all_zero_not_error() {
        let row = fitted().transform(&["Snow", "Morning"]).unwrap();
        assert_eq!(&row[..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&row[3..], &[0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_arity_mismatch_is_reported() {
        let err = fitted().transform(&["Rain"]).unwrap_err();
        assert!(matches!(
            err,
            EncoderError::ArityMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_empty_fit_fails() {
        let rows: Vec<Vec<&str>> = Vec::new();
        let err = OneHotEncoder::fit(&["weather_condition"], &rows).unwrap_err();
        assert!(matches!(err, EncoderError::EmptyColumn { .. }));
    }

    #[test]
    fn test_serde_preserves_column_order() {
        let encoder = fitted();
        let json = serde_json::to_string(&encoder).unwrap();
        let restored: OneHotEncoder = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.feature_names(), encoder.feature_names());
    }
}
