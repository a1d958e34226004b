//! Rain and wet-snow attenuation (ITU-R P.838 / P.530).

use crate::WeatherParams;

/// Specific rain attenuation `γ = k·R^α`, dB/km.
pub fn specific_attenuation(w: &WeatherParams) -> f64 {
    w.k * w.rain_mm_h.powf(w.alpha)
}

/// Rain/wet-snow multiplier Γ(Δh) for a link whose mean height lies `dh`
/// metres relative to the rain height.
///
/// Γ is 0 well above the melting layer and 1 well below it.
pub fn snow_factor(dh: f64) -> f64 {
    if dh > 0.0 {
        0.0
    } else if dh < -1200.0 {
        1.0
    } else {
        let a = 4.0 * (1.0 - (dh / 70.0).exp()).powi(2);
        let b = (1.0 - (-(dh / 600.0).powi(2)).exp()).powi(2);
        a / (1.0 + b * (a - 1.0))
    }
}

/// Height of the link midpoint relative to the rain height, metres.
///
/// The rain height is the 0 °C isotherm plus 360 m.
pub fn height_offset(w: &WeatherParams, z_a: f64, z_b: f64) -> f64 {
    w.altitude_m + (z_a + z_b) / 2.0 - (1000.0 * w.h0_km + 360.0)
}

/// Total weather attenuation over `distance` metres, dB.
pub fn attenuation(w: &WeatherParams, distance: f64, z_a: f64, z_b: f64) -> f64 {
    let rain = specific_attenuation(w) * distance / 1000.0;
    if w.combined_rain_snow {
        rain * snow_factor(height_offset(w, z_a, z_b))
    } else {
        rain
    }
}
