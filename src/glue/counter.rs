//! Count-up animation for statistic figures.

/// Length of one count-up.
pub const COUNT_DURATION_MS: f64 = 1600.0;
/// Targets from here on are shown with thousands separators.
pub const GROUPING_THRESHOLD: i64 = 1000;

pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Reads a count the way `parseInt(.., 10)` does: leading whitespace, an
/// optional sign, then as many digits as there are. `None` without digits.
pub fn parse_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Formats with a comma every three digits.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountFrame {
    pub text: String,
    pub done: bool,
}

/// One running count-up, from 0 to `target`.
#[derive(Debug, Clone)]
pub struct CountUp {
    target: i64,
    suffix: String,
    started_at: f64,
}

impl CountUp {
    pub fn new(target: i64, suffix: impl Into<String>, started_at: f64) -> Self {
        Self {
            target,
            suffix: suffix.into(),
            started_at,
        }
    }

    /// Builds a count-up from `data-count` and `data-suffix` values.
    pub fn from_attributes(count: &str, suffix: Option<&str>, started_at: f64) -> Option<Self> {
        let target = parse_count(count)?;
        Some(Self::new(target, suffix.unwrap_or_default(), started_at))
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    /// The text to show at `now_ms`. The last frame always shows the exact
    /// target.
    pub fn frame(&self, now_ms: f64) -> CountFrame {
        let progress = ((now_ms - self.started_at) / COUNT_DURATION_MS).clamp(0.0, 1.0);
        let done = progress >= 1.0;
        let value = if done {
            self.target
        } else {
            (ease_out_cubic(progress) * self.target as f64).floor() as i64
        };
        CountFrame {
            text: format!("{}{}", self.format(value), self.suffix),
            done,
        }
    }

    fn format(&self, value: i64) -> String {
        if self.target >= GROUPING_THRESHOLD {
            group_thousands(value)
        } else {
            value.to_string()
        }
    }
}
