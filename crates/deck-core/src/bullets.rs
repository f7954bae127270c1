//! Auto-numbered bullet counters and label formatting.

use deck_data::AutoNumberScheme;

/// Largest `startAt` DrawingML allows.
pub const MAX_START_AT: u32 = 32_767;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Counter {
    scheme: AutoNumberScheme,
    start_at: u32,
    next: u32,
}

/// Counters for one text body, one per outline level. A list run ends when
/// a paragraph at the same level carries no auto number, when the scheme or
/// `startAt` changes, or when a shallower level interrupts it.
#[derive(Debug, Default)]
pub struct AutoNumberState {
    levels: Vec<Option<Counter>>,
}

impl AutoNumberState {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, level: u8) -> &mut Option<Counter> {
        let level = level as usize;
        if self.levels.len() <= level {
            self.levels.resize(level + 1, None);
        }
        &mut self.levels[level]
    }

    fn reset_deeper(&mut self, level: u8) {
        for slot in self.levels.iter_mut().skip(level as usize + 1) {
            *slot = None;
        }
    }

    /// Advances the counter of `level` and returns the number to show.
    /// `start_at` is clamped to `1..=MAX_START_AT`.
    pub fn next(&mut self, level: u8, scheme: AutoNumberScheme, start_at: Option<u32>) -> u32 {
        self.reset_deeper(level);
        let start_at = start_at.unwrap_or(1).clamp(1, MAX_START_AT);
        let slot = self.slot(level);
        match slot {
            Some(c) if c.scheme == scheme && c.start_at == start_at => {
                let current = c.next;
                c.next = current.saturating_add(1);
                current
            }
            _ => {
                *slot = Some(Counter {
                    scheme,
                    start_at,
                    next: start_at.saturating_add(1),
                });
                start_at
            }
        }
    }

    /// A paragraph at `level` without an auto number.
    pub fn interrupt(&mut self, level: u8) {
        self.reset_deeper(level);
        *self.slot(level) = None;
    }
}

/// Formats `n` as the label for `scheme`, e.g. `3.`, `(c)`, `iv)`.
pub fn format_auto_number(scheme: AutoNumberScheme, n: u32) -> String {
    use AutoNumberScheme::*;
    let body = match scheme {
        ArabicPeriod | ArabicParenR | ArabicParenBoth | ArabicPlain | Unknown => n.to_string(),
        AlphaLcPeriod | AlphaLcParenR | AlphaLcParenBoth => alpha(n, false),
        AlphaUcPeriod | AlphaUcParenR | AlphaUcParenBoth => alpha(n, true),
        RomanLcPeriod | RomanLcParenR | RomanLcParenBoth => roman(n).to_lowercase(),
        RomanUcPeriod | RomanUcParenR | RomanUcParenBoth => roman(n),
    };
    match scheme {
        ArabicParenR | AlphaLcParenR | AlphaUcParenR | RomanLcParenR | RomanUcParenR => {
            format!("{body})")
        }
        ArabicParenBoth | AlphaLcParenBoth | AlphaUcParenBoth | RomanLcParenBoth
        | RomanUcParenBoth => format!("({body})"),
        ArabicPlain => body,
        _ => format!("{body}."),
    }
}

/// Letter repeats are capped; past that, labels stop growing.
const MAX_ALPHA_REPEAT: u32 = 64;

/// `a..z`, then `aa..zz`, `aaa..`: the letter repeats once per lap.
fn alpha(n: u32, upper: bool) -> String {
    let n = n.max(1) - 1;
    let letter = (b'a' + (n % 26) as u8) as char;
    let repeat = (n / 26 + 1).min(MAX_ALPHA_REPEAT) as usize;
    let s: String = std::iter::repeat(letter).take(repeat).collect();
    if upper {
        s.to_uppercase()
    } else {
        s
    }
}

/// Numerals past 3999 have no standard form and fall back to digits.
fn roman(mut n: u32) -> String {
    if n == 0 || n > 3999 {
        return n.to_string();
    }
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use AutoNumberScheme::*;

    #[test]
    fn consecutive_paragraphs_count_up() {
        let mut state = AutoNumberState::new();
        assert_eq!(state.next(0, ArabicPeriod, None), 1);
        assert_eq!(state.next(0, ArabicPeriod, None), 2);
    }

    #[test]
    fn nested_level_restarts_after_parent() {
        let mut state = AutoNumberState::new();
        state.next(0, ArabicPeriod, None);
        assert_eq!(state.next(1, AlphaLcParenR, None), 1);
        assert_eq!(state.next(1, AlphaLcParenR, None), 2);
        assert_eq!(state.next(0, ArabicPeriod, None), 2);
        assert_eq!(state.next(1, AlphaLcParenR, None), 1);
    }

    #[test]
    fn interruption_and_scheme_change_restart() {
        let mut state = AutoNumberState::new();
        state.next(0, ArabicPeriod, None);
        state.interrupt(0);
        assert_eq!(state.next(0, ArabicPeriod, None), 1);
        assert_eq!(state.next(0, ArabicPeriod, Some(5)), 5);
        assert_eq!(state.next(0, RomanUcPeriod, Some(5)), 5);
    }

    #[test]
    fn labels() {
        assert_eq!(format_auto_number(ArabicPeriod, 2), "2.");
        assert_eq!(format_auto_number(ArabicParenBoth, 3), "(3)");
        assert_eq!(format_auto_number(ArabicPlain, 7), "7");
        assert_eq!(format_auto_number(AlphaLcParenR, 3), "c)");
        assert_eq!(format_auto_number(AlphaUcPeriod, 27), "AA.");
        assert_eq!(format_auto_number(RomanLcPeriod, 4), "iv.");
        assert_eq!(format_auto_number(RomanUcParenR, 1994), "MCMXCIV)");
    }

    #[test]
    fn huge_start_values_are_clamped() {
        let mut state = AutoNumberState::new();
        assert_eq!(state.next(0, ArabicPeriod, Some(u32::MAX)), MAX_START_AT);
        assert_eq!(state.next(0, ArabicPeriod, Some(u32::MAX)), MAX_START_AT + 1);
        assert_eq!(state.next(1, AlphaLcPeriod, Some(0)), 1);
    }

    #[test]
    fn long_counts_stay_bounded() {
        assert_eq!(format_auto_number(AlphaLcPeriod, u32::MAX).len(), MAX_ALPHA_REPEAT as usize + 1);
        assert_eq!(format_auto_number(RomanUcPeriod, 4000), "4000.");
        let mut state = AutoNumberState::new();
        state.next(0, ArabicPlain, None);
        if let Some(Some(counter)) = state.levels.get_mut(0) {
            counter.next = u32::MAX;
        }
        assert_eq!(state.next(0, ArabicPlain, None), u32::MAX);
        assert_eq!(state.next(0, ArabicPlain, None), u32::MAX);
    }
}
