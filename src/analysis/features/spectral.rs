// Spectral module - Frequency-domain feature extraction
//
// All features are based on the magnitude spectrum (absolute values of FFT bins).
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

/// Floor applied to magnitudes before taking logarithms
const MAGNITUDE_FLOOR: f32 = 1e-10;

/// Compute spectral flatness (tonality measure)
///
/// Formula: flatness = geometric_mean(|X[i]|) / arithmetic_mean(|X[i]|)
///
/// Returns value between 0 (tonal, e.g., sine wave) and 1 (noise-like).
/// This is also known as the Wiener entropy. Magnitudes are floored so
/// empty bins pull the geometric mean down instead of being skipped, which
/// keeps the value stable from frame to frame.
///
/// # Arguments
/// * `spectrum` - Magnitude spectrum
///
/// # Returns
/// Spectral flatness (0.0 to 1.0); 0.0 for an empty or all-zero spectrum
pub fn compute_flatness(spectrum: &[f32]) -> f32 {
    if spectrum.is_empty() {
        return 0.0;
    }

    let n = spectrum.len() as f64;
    let mut log_sum = 0.0f64;
    let mut sum = 0.0f64;
    for &mag in spectrum {
        let mag = mag.max(MAGNITUDE_FLOOR) as f64;
        log_sum += mag.ln();
        sum += mag;
    }

    let geometric_mean = (log_sum / n).exp();
    let arithmetic_mean = sum / n;

    if arithmetic_mean > MAGNITUDE_FLOOR as f64 * 10.0 {
        (geometric_mean / arithmetic_mean).clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}
