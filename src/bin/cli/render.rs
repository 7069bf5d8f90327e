use prep_lib::planner::PlanItemStatus;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn status(status: PlanItemStatus, use_color: bool) -> String {
    let color = match status {
        PlanItemStatus::Done => Color::GREEN,
        PlanItemStatus::Skipped => Color::GRAY,
        PlanItemStatus::Pending => Color::YELLOW,
    };
    paint(&format!("{:<7}", status.as_str()), color, use_color)
}

/// Text bar of `width` cells filled to `percent`
pub fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}
