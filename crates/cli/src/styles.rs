//! Help output colors.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};

/// Cargo-like help colors, with flag names underlined so the many
/// `--*-ms` timing flags stand apart from their placeholders.
pub fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(AnsiColor::Cyan.on_default().effects(Effects::UNDERLINE))
		.placeholder(AnsiColor::Cyan.on_default())
		.valid(AnsiColor::Cyan.on_default())
		.invalid(AnsiColor::Yellow.on_default().bold())
		.error(AnsiColor::Red.on_default().bold())
}
