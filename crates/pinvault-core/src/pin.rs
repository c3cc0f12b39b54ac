//! PIN strength warnings
//!
//! PINs are short by nature, so this is a rough guide rather than an
//! entropy estimate. It flags the patterns people actually pick: repeated
//! digits, runs like `1234` or `9876`, and dates/years.
//!
//! # Important
//!
//! This is a **warning system**, not a gate. The vault accepts any PIN;
//! callers decide what to do with the analysis.

use std::collections::HashSet;

/// Minimum PIN length we recommend
pub const MIN_RECOMMENDED_LEN: usize = 6;

/// PIN strength level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PinStrength {
    /// Guessable in a handful of tries
    Dangerous,
    /// Short or patterned
    Weak,
    /// Reasonable for a device-local PIN
    Fair,
    /// Long, mixed, or both
    Strong,
}

impl PinStrength {
    /// Human-readable description of the strength level
    pub fn description(&self) -> &'static str {
        match self {
            Self::Dangerous => "Dangerous: among the first PINs an attacker would try",
            Self::Weak => "Weak: short or follows an obvious pattern",
            Self::Fair => "Fair: acceptable for a PIN that never leaves this device",
            Self::Strong => "Strong",
        }
    }

    pub fn is_recommended(&self) -> bool {
        *self >= Self::Fair
    }
}

/// Result of PIN analysis
#[derive(Debug, Clone)]
pub struct PinAnalysis {
    pub strength: PinStrength,
    /// Specific warnings (empty if no issues)
    pub warnings: Vec<String>,
}

/// PINs that top every leaked-PIN frequency table
const COMMON_PINS: &[&str] = &[
    "0000", "1111", "1212", "1234", "1004", "2000", "4444", "2222", "6969", "9999",
    "3333", "5555", "6666", "1122", "1313", "8888", "4321", "2001", "1010", "7777",
    "000000", "111111", "112233", "121212", "123123", "123321", "123456", "654321",
    "666666", "696969", "777777", "987654", "999999", "159753", "147258",
];

/// Analyze a PIN and classify its strength.
///
/// # Example
/// ```
/// use pinvault_core::pin::{analyze_pin, PinStrength};
/// assert_eq!(analyze_pin("123456").strength, PinStrength::Dangerous);
/// assert!(analyze_pin("58207193").strength.is_recommended());
/// ```
pub fn analyze_pin(pin: &str) -> PinAnalysis {
    if pin.is_empty() {
        return PinAnalysis {
            strength: PinStrength::Dangerous,
            warnings: vec!["PIN is empty".to_string()],
        };
    }

    let mut warnings = Vec::new();
    let len = pin.chars().count();
    let all_digits = pin.chars().all(|c| c.is_ascii_digit());

    if COMMON_PINS.contains(&pin) {
        warnings.push("This is one of the most commonly used PINs".to_string());
        return PinAnalysis {
            strength: PinStrength::Dangerous,
            warnings,
        };
    }

    let unique: HashSet<char> = pin.chars().collect();
    if unique.len() == 1 {
        warnings.push("PIN repeats a single character".to_string());
        return PinAnalysis {
            strength: PinStrength::Dangerous,
            warnings,
        };
    }

    let mut score: i32 = 0;

    if len < 4 {
        warnings.push("PIN is very short (< 4 characters)".to_string());
        score -= 2;
    } else if len < MIN_RECOMMENDED_LEN {
        warnings.push(format!(
            "Consider a longer PIN ({}+ digits recommended)",
            MIN_RECOMMENDED_LEN
        ));
    } else {
        score += 1;
    }
    if len >= 10 {
        score += 1;
    }

    if !all_digits {
        score += 1;
    }

    if is_monotonic_run(pin) {
        warnings.push("PIN is a sequential run".to_string());
        score -= 2;
    }

    if unique.len() * 2 <= len {
        warnings.push("PIN uses very few distinct characters".to_string());
        score -= 1;
    }

    if all_digits && looks_like_year(pin) {
        warnings.push("PIN looks like a year or date".to_string());
        score -= 1;
    }

    let strength = match score {
        s if s <= -2 => PinStrength::Dangerous,
        s if s <= 0 => PinStrength::Weak,
        1 => PinStrength::Fair,
        _ => PinStrength::Strong,
    };

    PinAnalysis { strength, warnings }
}

/// Every step between consecutive characters is the same +1 or -1
fn is_monotonic_run(pin: &str) -> bool {
    let codes: Vec<i64> = pin.chars().map(|c| c as i64).collect();
    if codes.len() < 3 {
        return false;
    }
    let step = codes[1] - codes[0];
    step.abs() == 1 && codes.windows(2).all(|w| w[1] - w[0] == step)
}

/// 4-digit years and DDMMYY/MMDDYY-shaped dates
fn looks_like_year(pin: &str) -> bool {
    match pin.len() {
        4 => matches!(pin.parse::<u32>(), Ok(y) if (1900..=2099).contains(&y)),
        6 => {
            let first: u32 = pin[0..2].parse().unwrap_or(99);
            let second: u32 = pin[2..4].parse().unwrap_or(99);
            ((1..=31).contains(&first) && (1..=12).contains(&second))
                || ((1..=12).contains(&first) && (1..=31).contains(&second))
        }
        _ => false,
    }
}
