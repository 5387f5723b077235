/* src/ui.rs */

// Terminal output helpers. Plain ANSI, no color crate.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const BLACK: &str = "\x1b[30m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";
pub const BG_GREEN: &str = "\x1b[42m";
pub const BG_YELLOW: &str = "\x1b[43m";

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn banner(cmd: &str) {
  println!();
  println!("  {BOLD}gantry{RESET} {cmd} {DIM}v{VERSION}{RESET}");
  println!();
}

/// Inverse-video mode line printed before every build.
pub fn mode_banner(label: &str, bg: &str) {
  println!("  You are running in {BLACK}{bg} {label} {RESET} mode.");
  println!();
}

pub fn ok(msg: &str) {
  println!("  {GREEN}✓{RESET} {msg}");
}

pub fn fail(msg: &str) {
  println!("  {RED}✗{RESET} {msg}");
}

pub fn warn(msg: &str) {
  println!("  {YELLOW}!{RESET} {msg}");
}

pub fn arrow(msg: &str) {
  println!("  {GREEN}→{RESET} {BOLD}{msg}{RESET}");
}

pub fn step(current: usize, total: usize, msg: &str) {
  println!("  {DIM}[{current}/{total}]{RESET} {msg}");
}

pub fn detail(msg: &str) {
  println!("      {msg}");
}

pub fn detail_ok(msg: &str) {
  println!("      {GREEN}✓{RESET} {msg}");
}

pub fn blank() {
  println!();
}

/// Human-readable byte size, 1024-based.
pub fn format_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
  let mut size = bytes as f64;
  let mut unit = 0;
  while size >= 1024.0 && unit < UNITS.len() - 1 {
    size /= 1024.0;
    unit += 1;
  }
  if unit == 0 { format!("{bytes} {}", UNITS[0]) } else { format!("{size:.1} {}", UNITS[unit]) }
}
