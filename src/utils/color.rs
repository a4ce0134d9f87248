use crate::notify::NotificationKind;
use eframe::egui::Color32;

pub trait ColorExt {
    fn from_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;

        Some(Color32::from_rgb(r, g, b))
    }
}

pub const ACCENT: Color32 = Color32::from_rgb(66, 133, 244);

/// Background colour of the notification banner for each kind.
pub fn notification_fill(kind: NotificationKind) -> Color32 {
    let hex = match kind {
        NotificationKind::Info => "#2d7dd2",
        NotificationKind::Success => "#2e9e4f",
        NotificationKind::Error => "#d64545",
        NotificationKind::Warning => "#e0a030",
    };
    Color32::from_hex(hex).unwrap_or(ACCENT)
}
