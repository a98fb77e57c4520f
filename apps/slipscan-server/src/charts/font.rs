//! Embedded label font (DejaVu Sans)

use ab_glyph::{FontRef, PxScale};
use imageproc::drawing::text_size;

use super::ChartError;

static DEJAVU_SANS: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

pub fn load() -> Result<FontRef<'static>, ChartError> {
    FontRef::try_from_slice(DEJAVU_SANS).map_err(|e| ChartError::Font(e.to_string()))
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width` pixels
pub fn fit(font: &FontRef<'_>, scale: PxScale, text: &str, max_width: u32) -> String {
    if text_size(scale, font, text).0 <= max_width {
        return text.to_string();
    }

    let mut chars: Vec<char> = text.chars().collect();
    while chars.pop().is_some() {
        let candidate: String = chars.iter().chain(std::iter::once(&'…')).collect();
        if text_size(scale, font, &candidate).0 <= max_width {
            return candidate;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_truncates_long_labels() {
        let font = load().unwrap();
        let scale = PxScale::from(14.0);

        assert_eq!(fit(&font, scale, "a.jpg", 500), "a.jpg");

        let long = "salary_slip_march_2024_final_scan.jpg";
        let fitted = fit(&font, scale, long, 60);
        assert!(fitted.ends_with('…'));
        assert!(text_size(scale, &font, &fitted).0 <= 60);
        assert_eq!(fit(&font, scale, long, 0), "");
    }
}
