//! Color constants for the query window.

use egui::Color32;

/// Background colors for different layers
pub mod bg {
    use super::*;

    /// Response area - darkest layer
    pub const RESPONSE: Color32 = Color32::from_rgb(14, 17, 23);

    /// Side panel background
    pub const PANEL: Color32 = Color32::from_rgb(20, 22, 28);
}

/// Accent colors
pub mod accent {
    use super::*;

    /// Primary accent, used for the loading indicator
    pub const ORANGE: Color32 = Color32::from_rgb(255, 149, 0);

    /// Success states
    pub const GREEN: Color32 = Color32::from_rgb(34, 197, 94);

    /// Errors
    pub const RED: Color32 = Color32::from_rgb(239, 68, 68);
}

/// Text colors at different emphasis levels
pub mod text {
    use super::*;

    pub const PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
    pub const MUTED: Color32 = Color32::from_rgb(120, 125, 135);
}

/// Color for a one-line status message: red for reported errors, green otherwise.
pub fn status_color(line: &str) -> Color32 {
    if line.starts_with("Error: ") {
        accent::RED
    } else {
        accent::GREEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_color() {
        assert_eq!(status_color("Error: HTTP error! status: 500"), accent::RED);
        assert_eq!(status_color("Link submitted successfully!"), accent::GREEN);
    }
}
