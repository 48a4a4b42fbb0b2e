//! Body-mass index calculation and advisory bands.

use crate::{Error, ProgressState, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiBand {
    Underweight,
    Normal,
    Overweight,
    Obesity,
}

impl BmiBand {
    /// Band for an already rounded BMI value
    pub fn for_value(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiBand::Underweight
        } else if bmi < 24.9 {
            BmiBand::Normal
        } else if bmi < 29.9 {
            BmiBand::Overweight
        } else {
            BmiBand::Obesity
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            BmiBand::Underweight => "Underweight: add strength training & more calories.",
            BmiBand::Normal => "Normal: maintain with balanced routine.",
            BmiBand::Overweight => "Overweight: focus on cardio + light strength.",
            BmiBand::Obesity => "Obesity: slow fat loss; consider professional guidance.",
        }
    }
}

impl fmt::Display for BmiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BmiBand::Underweight => "Underweight",
            BmiBand::Normal => "Normal",
            BmiBand::Overweight => "Overweight",
            BmiBand::Obesity => "Obesity",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BmiReading {
    /// Rounded to one decimal
    pub value: f64,
    pub band: BmiBand,
}

fn usable(measurement: f64) -> bool {
    measurement.is_finite() && measurement > 0.0
}

/// Compute BMI from height in centimetres and weight in kilograms.
///
/// Returns [`Error::MissingMeasurement`] when either input is zero, negative
/// or not a number.
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Result<BmiReading> {
    if !usable(height_cm) || !usable(weight_kg) {
        return Err(Error::MissingMeasurement);
    }

    let height_m = height_cm / 100.0;
    let value = (weight_kg / (height_m * height_m) * 10.0).round() / 10.0;

    Ok(BmiReading {
        value,
        band: BmiBand::for_value(value),
    })
}

impl ProgressState {
    /// Compute BMI and keep the value on success; failures leave the state untouched
    pub fn record_bmi(&mut self, height_cm: f64, weight_kg: f64) -> Result<BmiReading> {
        let reading = compute_bmi(height_cm, weight_kg)?;
        self.bmi = Some(reading.value);
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_bmi() {
        let reading = compute_bmi(180.0, 72.0).unwrap();
        assert_eq!(reading.value, 22.2);
        assert_eq!(reading.band, BmiBand::Normal);
        assert_eq!(reading.band.to_string(), "Normal");
    }

    #[test]
    fn test_missing_inputs() {
        assert!(matches!(compute_bmi(0.0, 70.0), Err(Error::MissingMeasurement)));
        assert!(matches!(compute_bmi(175.0, 0.0), Err(Error::MissingMeasurement)));
        assert!(matches!(compute_bmi(f64::NAN, 70.0), Err(Error::MissingMeasurement)));
        assert!(matches!(compute_bmi(-170.0, 70.0), Err(Error::MissingMeasurement)));
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(BmiBand::for_value(18.4), BmiBand::Underweight);
        assert_eq!(BmiBand::for_value(18.5), BmiBand::Normal);
        assert_eq!(BmiBand::for_value(24.8), BmiBand::Normal);
        assert_eq!(BmiBand::for_value(24.9), BmiBand::Overweight);
        assert_eq!(BmiBand::for_value(29.8), BmiBand::Overweight);
        assert_eq!(BmiBand::for_value(29.9), BmiBand::Obesity);
        assert_eq!(BmiBand::for_value(41.0), BmiBand::Obesity);
    }

    #[test]
    fn test_rounding_decides_band() {
        // 18.49.. rounds up to 18.5
        let reading = compute_bmi(170.0, 53.44).unwrap();
        assert_eq!(reading.value, 18.5);
        assert_eq!(reading.band, BmiBand::Normal);
    }

    #[test]
    fn test_record_bmi_only_on_success() {
        let mut state = ProgressState::default();
        assert!(state.record_bmi(0.0, 70.0).is_err());
        assert_eq!(state, ProgressState::default());

        let reading = state.record_bmi(160.0, 82.0).unwrap();
        assert_eq!(reading.value, 32.0);
        assert_eq!(reading.band, BmiBand::Obesity);
        assert_eq!(state.bmi, Some(32.0));
    }
}
