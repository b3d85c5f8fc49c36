//! Color codec.
//!
//! Converts normalized channel values (nominally `0.0..=1.0`) to lowercase
//! hex strings. Channels are not clamped: a value outside the unit range still
//! produces its scaled hex digits, which may be longer than two characters or
//! carry a leading `-`.

/// Convert channel values to `#rrggbb`, or `#rrggbbaa` when `a` is present and not `1`.
pub fn rgb_to_hex(r: f64, g: f64, b: f64, a: Option<f64>) -> String {
    let mut hex = format!("#{}{}{}", channel_hex(r), channel_hex(g), channel_hex(b));

    if let Some(alpha) = a {
        if alpha != 1.0 {
            hex.push_str(&channel_hex(alpha));
        }
    }

    hex
}

/// Scale one channel to `0..=255` and render it as at least two hex digits.
fn channel_hex(value: f64) -> String {
    let scaled = value * 255.0;
    if !scaled.is_finite() {
        return if scaled.is_nan() {
            "NaN".into()
        } else if scaled > 0.0 {
            "Infinity".into()
        } else {
            "-Infinity".into()
        };
    }

    // Round half toward positive infinity.
    let rounded = (scaled + 0.5).floor() as i64;
    let digits = if rounded < 0 {
        format!("-{:x}", rounded.unsigned_abs())
    } else {
        format!("{rounded:x}")
    };

    if digits.len() == 1 {
        format!("0{digits}")
    } else {
        digits
    }
}
