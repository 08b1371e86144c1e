use std::io::IsTerminal;

use clap::{
  ValueEnum,
  builder::styling::{Color as ClapColor, RgbColor, Style, Styles},
};
use crossterm::style::Color;
use http::Method;

use crate::generator::diagnostics::Severity;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// What a piece of terminal output stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  Timestamp,
  Progress,
  Label,
  Count,
  Identifier,
  Path,
  Tag,
  Success,
  Warning,
  Error,
  /// Safe HTTP methods.
  Read,
  /// Methods that create or change a resource.
  Write,
  Delete,
}

type Rgb = (u8, u8, u8);

const fn rgb((r, g, b): Rgb) -> Color {
  Color::Rgb { r, g, b }
}

const fn dark(role: Role) -> Rgb {
  match role {
    Role::Timestamp | Role::Tag => (118, 166, 166),
    Role::Progress => (191, 126, 4),
    Role::Label => (217, 164, 4),
    Role::Count | Role::Identifier => (242, 211, 56),
    Role::Path => (200, 200, 190),
    Role::Success | Role::Read => (120, 190, 120),
    Role::Warning | Role::Write => (230, 170, 60),
    Role::Error | Role::Delete => (215, 95, 75),
  }
}

const fn light(role: Role) -> Rgb {
  match role {
    Role::Timestamp => (92, 62, 38),
    Role::Progress | Role::Path => (70, 42, 25),
    Role::Label => (176, 103, 66),
    Role::Count | Role::Identifier => (150, 100, 30),
    Role::Tag => (40, 111, 170),
    Role::Success | Role::Read => (34, 142, 90),
    Role::Warning | Role::Write => (170, 110, 0),
    Role::Error | Role::Delete => (190, 50, 40),
  }
}

/// Terminal palette. Every lookup collapses to [`Color::Reset`] when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  pub const fn get(&self, role: Role) -> Color {
    if !self.enabled {
      return Color::Reset;
    }
    match self.theme {
      Theme::Dark => rgb(dark(role)),
      Theme::Light => rgb(light(role)),
    }
  }

  pub const fn severity(&self, severity: Severity) -> Color {
    match severity {
      Severity::Error => self.get(Role::Error),
      Severity::Warning => self.get(Role::Warning),
    }
  }

  pub fn method(&self, method: &Method) -> Color {
    let role = if method.is_safe() {
      Role::Read
    } else if *method == Method::DELETE {
      Role::Delete
    } else {
      Role::Write
    };
    self.get(role)
  }

  /// Same palette for `comfy-table` cells.
  pub fn cell(&self, color: Color) -> comfy_table::Color {
    match color {
      Color::Rgb { r, g, b } => comfy_table::Color::Rgb { r, g, b },
      _ => comfy_table::Color::Reset,
    }
  }

  pub const fn clap_styles() -> Styles {
    const fn fg(role: Role) -> Option<ClapColor> {
      let (r, g, b) = dark(role);
      Some(ClapColor::Rgb(RgbColor(r, g, b)))
    }

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(fg(Role::Label)))
      .usage(Style::new().bold().fg_color(fg(Role::Label)))
      .literal(Style::new().fg_color(fg(Role::Success)))
      .placeholder(Style::new().fg_color(fg(Role::Tag)))
      .error(Style::new().bold().fg_color(fg(Role::Error)))
      .valid(Style::new().fg_color(fg(Role::Success)))
      .invalid(Style::new().bold().fg_color(fg(Role::Error)))
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()),
  }
}

/// `COLORFGBG` is `fg;bg`; background palette indexes 7 and up are light.
fn theme_from_colorfgbg(value: Option<&str>) -> Theme {
  match value
    .and_then(|v| v.rsplit(';').next())
    .and_then(|bg| bg.parse::<u8>().ok())
  {
    Some(bg) if bg >= 7 => Theme::Light,
    _ => Theme::Dark,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_disabled_palette_resets() {
    let colors = Colors::new(false, Theme::Light);
    assert_eq!(colors.get(Role::Label), Color::Reset);
    assert_eq!(colors.severity(Severity::Error), Color::Reset);
    assert_eq!(colors.cell(colors.get(Role::Path)), comfy_table::Color::Reset);
  }

  #[test]
  fn test_methods_group_by_effect() {
    let colors = Colors::new(true, Theme::Dark);
    assert_eq!(colors.method(&Method::GET), colors.get(Role::Read));
    assert_eq!(colors.method(&Method::HEAD), colors.get(Role::Read));
    assert_eq!(colors.method(&Method::POST), colors.get(Role::Write));
    assert_eq!(colors.method(&Method::PATCH), colors.get(Role::Write));
    assert_eq!(colors.method(&Method::DELETE), colors.get(Role::Delete));
  }

  #[test]
  fn test_theme_from_colorfgbg() {
    assert_eq!(theme_from_colorfgbg(Some("0;15")), Theme::Light);
    assert_eq!(theme_from_colorfgbg(Some("15;0")), Theme::Dark);
    assert_eq!(theme_from_colorfgbg(Some("garbage")), Theme::Dark);
    assert_eq!(theme_from_colorfgbg(None), Theme::Dark);
  }
}
