use crate::domain::errors::EncoderError;
use crate::domain::ml::encoder::OneHotEncoder;
use crate::domain::pricing::types::{PricingFeatures, TrainingSample};

/// Numeric columns, in vector order.
/// Any change here is a breaking change for persisted models.
pub const NUMERIC_FEATURES: &[&str] = &["distance_km", "traffic_duration_seconds", "is_holiday"];

/// Categorical columns fed to the encoder, in encoder order
pub const CATEGORICAL_FEATURES: &[&str] = &["weather_condition", "time_of_day"];

/// Full model input layout: numeric columns followed by the encoder's columns
pub fn feature_names(encoder: &OneHotEncoder) -> Vec<String> {
    NUMERIC_FEATURES
        .iter()
        .map(|s| s.to_string())
        .chain(encoder.feature_names())
        .collect()
}

fn categorical_values(fs: &PricingFeatures) -> [&'static str; 2] {
    [fs.weather_condition.as_str(), fs.time_of_day.as_str()]
}

/// Fit the encoder on the categorical columns of a training table
pub fn fit_encoder(samples: &[TrainingSample]) -> Result<OneHotEncoder, EncoderError> {
    let rows: Vec<Vec<&str>> = samples
        .iter()
        .map(|s| categorical_values(&s.features()).to_vec())
        .collect();
    OneHotEncoder::fit(CATEGORICAL_FEATURES, &rows)
}

/// Build the model input vector. Used identically at train and inference time.
pub fn features_to_vector(
    fs: &PricingFeatures,
    encoder: &OneHotEncoder,
) -> Result<Vec<f64>, EncoderError> {
    let mut vec = Vec::with_capacity(NUMERIC_FEATURES.len() + encoder.width());
    vec.push(fs.distance_km);
    vec.push(fs.traffic_duration_seconds as f64);
    vec.push(if fs.is_holiday { 1.0 } else { 0.0 });
    vec.extend(encoder.transform(&categorical_values(fs))?);
    Ok(vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::types::{TimeOfDay, WeatherCondition};

    fn full_table() -> Vec<TrainingSample> {
        let mut samples = Vec::new();
        for w in WeatherCondition::ALL {
            for t in TimeOfDay::ALL {
                samples.push(TrainingSample {
                    distance_km: 3.0,
                    traffic_duration_seconds: 400,
                    weather_condition: w,
                    time_of_day: t,
                    is_holiday: false,
                    price_multiplier: 1.0,
                });
            }
        }
        samples
    }

    #[test]
    fn test_feature_vector_length() {
        let encoder = fit_encoder(&full_table()).unwrap();
        let fs = full_table()[0].features();
        let vec = features_to_vector(&fs, &encoder).unwrap();
        assert_eq!(vec.len(), feature_names(&encoder).len());
        assert_eq!(vec.len(), 10);
    }

    #[test]
    fn test_feature_layout_is_stable() {
        let encoder = fit_encoder(&full_table()).unwrap();
        assert_eq!(
            feature_names(&encoder),
            vec![
                "distance_km",
                "traffic_duration_seconds",
                "is_holiday",
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
    fn test_feature_consistency() {
        let encoder = fit_encoder(&full_table()).unwrap();
        let fs = PricingFeatures {
            distance_km: 5.2,
            traffic_duration_seconds: 1200,
            weather_condition: WeatherCondition::Rain,
            time_of_day: TimeOfDay::DinnerRush,
            is_holiday: true,
        };

        let vec = features_to_vector(&fs, &encoder).unwrap();
        assert_eq!(vec[0], 5.2);
        assert_eq!(vec[1], 1200.0);
        assert_eq!(vec[2], 1.0);
        assert_eq!(&vec[3..], &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    }
}
