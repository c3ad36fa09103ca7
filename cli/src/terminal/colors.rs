use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 200, b: 255 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const IPV4_ADDR: Color = Color::TrueColor { r: 170, g: 220, b: 255 };
pub const IPV6_ADDR: Color = Color::TrueColor { r: 200, g: 170, b: 255 };

pub const SUCCESS: Color = Color::Green;
pub const PARTIAL: Color = Color::Yellow;
pub const FAILED: Color = Color::Red;
