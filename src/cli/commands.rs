use bitlab::workspace::{Frame, Player, PlayerState};
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, poll, read};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Parse interval string like "5s", "500ms" or "1m"
pub fn parse_interval(s: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    let s = s.trim();

    // Try to find where digits end
    let split_pos = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or("Invalid duration format")?;

    let (num_str, unit) = s.split_at(split_pos);
    let value: u64 = num_str.parse()?;

    let duration = match unit {
        "ms" => Duration::from_millis(value),
        "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value * 60),
        _ => return Err(format!("Unknown duration unit: {}", unit).into()),
    };

    if duration.is_zero() {
        return Err("Interval must be greater than zero".into());
    }
    Ok(duration)
}

/// One line per frame: step, label, scores, verdict and a bits preview.
pub fn render_frame(frame: &Frame, width: usize, color: bool) -> String {
    let after = frame
        .score_after
        .map_or_else(|| "-".to_string(), |s| format!("{:.4}", s));
    let verdict = match (&frame.error, frame.accepted) {
        (Some(_), _) => "error",
        (None, true) => "kept",
        (None, false) => "rejected",
    };
    let verdict = if color {
        let code = if frame.accepted { "32" } else { "31" };
        format!("\x1b[{}m{:<8}\x1b[0m", code, verdict)
    } else {
        format!("{:<8}", verdict)
    };

    let mut line = format!(
        "{:>4}  {:<24} {:>10.4} -> {:>10}  {}",
        frame.index + 1,
        frame.label,
        frame.score_before,
        after,
        verdict
    );
    if let Some(error) = &frame.error {
        line.push_str(&format!("  {}", error));
    } else {
        let room = width.saturating_sub(70);
        if room > 8 {
            let bits = frame.bits.to_string();
            let preview: String = bits.chars().take(room).collect();
            let ellipsis = if bits.len() > room { "..." } else { "" };
            line.push_str(&format!("  {}{}", preview, ellipsis));
        }
    }
    line
}

pub fn terminal_width() -> usize {
    match terminal_size::terminal_size() {
        Some((terminal_size::Width(w), _)) => w as usize,
        None => 80,
    }
}

/// Restores the terminal when playback ends, including on error.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self, Box<dyn std::error::Error>> {
        enable_raw_mode().map_err(|e| format!("Playback needs an interactive terminal: {}", e))?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Timed, keyboard-controlled playback.
///
/// Keys: space pause/resume, right step, left step back, r reset, q/Esc quit.
pub fn playback(
    player: &mut Player,
    interval: Duration,
    color: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let width = terminal_width();
    let mut out = io::stdout();

    if !quiet {
        writeln!(
            out,
            "Strategy: {} ({} steps, every {:?})",
            player.strategy().name,
            player.total_steps(),
            interval
        )?;
        writeln!(
            out,
            "[space] pause/resume  [->] step  [<-] back  [r] reset  [q] quit"
        )?;
        writeln!(out, "   0  {:<24} {:>10.4}", "start", player.initial_score())?;
    }

    let _raw = RawMode::enable()?;
    player.play();
    let mut last_tick = Instant::now();

    loop {
        let timeout = interval.saturating_sub(last_tick.elapsed());
        if poll(timeout)?
            && let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) = read()?
        {
            match code {
                KeyCode::Char(' ') => {
                    if player.state() == PlayerState::Playing {
                        player.pause();
                        write!(out, "-- paused at step {} --\r\n", player.position())?;
                    } else if player.play() {
                        last_tick = Instant::now();
                    }
                }
                KeyCode::Right => {
                    player.pause();
                    if let Some(frame) = player.step() {
                        write!(out, "{}\r\n", render_frame(frame, width, color))?;
                    }
                }
                KeyCode::Left => {
                    player.pause();
                    if player.step_back() {
                        write!(
                            out,
                            "-- back to step {} (score {:.4}) --\r\n",
                            player.position(),
                            player.current_score()
                        )?;
                    }
                }
                KeyCode::Char('r') => {
                    player.reset();
                    write!(out, "-- reset --\r\n")?;
                }
                KeyCode::Char('q') | KeyCode::Esc => break,
                _ => {}
            }
            out.flush()?;
        }

        if last_tick.elapsed() >= interval {
            last_tick = Instant::now();
            if let Some(frame) = player.tick() {
                write!(out, "{}\r\n", render_frame(frame, width, color))?;
                out.flush()?;
            }
        }

        if player.state() == PlayerState::Finished {
            write!(
                out,
                "-- finished: score {:.4} -> {:.4} --\r\n",
                player.initial_score(),
                player.current_score()
            )?;
            break;
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitlab::BitString;

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_interval("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_interval("1m").unwrap(), Duration::from_secs(60));
        assert!(parse_interval("5").is_err());
        assert!(parse_interval("0s").is_err());
        assert!(parse_interval("3h").is_err());
    }

    #[test]
    fn test_render_frame() {
        let frame = Frame {
            index: 0,
            label: "not".to_string(),
            score_before: 1.0,
            score_after: Some(2.0),
            accepted: true,
            error: None,
            bits: BitString::parse("0101").unwrap(),
        };
        let line = render_frame(&frame, 120, false);
        assert!(line.contains("not"));
        assert!(line.contains("kept"));
        assert!(line.contains("0101"));

        let failed = Frame {
            score_after: None,
            accepted: false,
            error: Some("bad input".to_string()),
            ..frame
        };
        let line = render_frame(&failed, 80, false);
        assert!(line.contains("error"));
        assert!(line.contains("bad input"));
    }
}
