use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::export::HintTone;

// ---------------------------------------------------------------------------
// HSL helpers
// ---------------------------------------------------------------------------

fn hsl(hue: f32, saturation: f32, lightness: f32) -> Srgb {
    Hsl::new(hue, saturation, lightness).into_color()
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert an HSL triple plus opacity to an egui colour.
pub fn from_hsl(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Color32 {
    let rgb = hsl(hue, saturation, lightness);
    Color32::from_rgba_unmultiplied(
        to_u8(rgb.red),
        to_u8(rgb.green),
        to_u8(rgb.blue),
        to_u8(alpha),
    )
}

// ---------------------------------------------------------------------------
// Plot and status colours
// ---------------------------------------------------------------------------

pub fn waveform_line() -> Color32 {
    from_hsl(240.0, 1.0, 0.5, 1.0)
}

/// Orange at 30% opacity.
pub fn selection_fill() -> Color32 {
    from_hsl(39.0, 1.0, 0.5, 0.3)
}

pub fn selection_outline() -> Color32 {
    from_hsl(0.0, 1.0, 0.5, 1.0)
}

pub fn hint_color(tone: HintTone) -> Color32 {
    match tone {
        HintTone::Affirmative => from_hsl(120.0, 0.75, 0.35, 1.0),
        HintTone::Negative => from_hsl(0.0, 0.85, 0.5, 1.0),
    }
}
