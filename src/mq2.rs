//! MQ-2 gas sensor conversion, as computed by the logging firmware.
//!
//! The sensor sits in a divider with the load resistor RL; the ADC reads
//! the voltage across RL and the sensor resistance Rs follows from it.
//! ppm comes from the datasheet power-law fit of Rs/R0.

use std::convert::TryFrom;

/// load resistor [kΩ]
pub const RL: f64 = 0.5;
/// supply voltage [V]
pub const VC: f64 = 5.0;
/// sensor resistance in clean air [kΩ]
pub const R0: f64 = 6.64;
/// full scale of the 12 bit ADC
pub const ADC_FULL_SCALE: f64 = 4095.0;
/// samples averaged per reading
pub const ADC_SAMPLES: usize = 12;

const CURVE_SCALE: f64 = 11.5428;
const CURVE_EXPONENT: f64 = -0.6549;

/// integer mean of the ADC samples, None for an empty buffer
pub fn average_adc(samples: &[u16]) -> Option<u16> {
    if samples.is_empty() {
        return None;
    }
    let sum: u64 = samples.iter().map(|&s| u64::from(s)).sum();
    u16::try_from(sum / samples.len() as u64).ok()
}

pub fn voltage_from_adc(adc: u16) -> f64 {
    adc as f64 / ADC_FULL_SCALE * VC
}

/// ppm for a voltage across RL; 0 V gives 0 ppm
pub fn ppm_from_voltage(vrl: f64) -> f64 {
    let rs = (VC - vrl) * RL / vrl;
    let ratio = rs / R0;
    (ratio / CURVE_SCALE).powf(1. / CURVE_EXPONENT)
}

pub fn ppm_from_adc(adc: u16) -> f64 {
    ppm_from_voltage(voltage_from_adc(adc))
}

/// voltage across RL that reads as the given ppm
pub fn voltage_from_ppm(ppm: f64) -> f64 {
    let rs = CURVE_SCALE * ppm.powf(CURVE_EXPONENT) * R0;
    VC * RL / (rs + RL)
}

/// ADC count, not rounded, that reads as the given ppm
pub fn adc_from_ppm(ppm: f64) -> f64 {
    voltage_from_ppm(ppm) / VC * ADC_FULL_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_adc() {
        let buffer = [1000u16; ADC_SAMPLES];
        assert_eq!(average_adc(&buffer), Some(1000));
        assert_eq!(average_adc(&[1, 2]), Some(1));
        assert_eq!(average_adc(&[]), None);
        let long = vec![4095u16; 70_000];
        assert_eq!(average_adc(&long), Some(4095));
    }

    #[test]
    fn test_voltage_from_adc() {
        assert_eq!(voltage_from_adc(0), 0.);
        assert!((voltage_from_adc(4095) - VC).abs() < 1e-12);
    }

    #[test]
    fn test_unit_ppm_at_curve_scale() {
        // Rs / R0 == CURVE_SCALE gives exactly 1 ppm
        let rs = CURVE_SCALE * R0;
        let vrl = VC * RL / (rs + RL);
        assert!((ppm_from_voltage(vrl) - 1.).abs() < 1e-9);
    }

    #[test]
    fn test_ppm_rises_with_voltage() {
        let low = ppm_from_adc(500);
        let mid = ppm_from_adc(1500);
        let high = ppm_from_adc(3000);
        assert!(low < mid && mid < high);
        assert_eq!(ppm_from_adc(0), 0.);
    }

    #[test]
    fn test_adc_from_ppm_inverts_ppm_from_adc() {
        let adc = 1500u16;
        let back = adc_from_ppm(ppm_from_adc(adc));
        assert!((back - adc as f64).abs() < 1e-6);
        assert!((voltage_from_ppm(1.) - VC * RL / (CURVE_SCALE * R0 + RL)).abs() < 1e-12);
    }
}
