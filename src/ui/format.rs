use std::fmt;

/// Group digits the way French number formatting does: `1234567` becomes
/// `1 234 567` with narrow no-break spaces.
pub fn format_number_fr(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\u{202f}');
        }
        out.push(c);
    }
    out
}

/// Sticky footer of a photographer page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickyBar {
    pub total_likes: u64,
    /// Daily rate in euros.
    pub price_per_day: u64,
}

impl fmt::Display for StickyBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ♥  {}€ / jour",
            format_number_fr(self.total_likes),
            format_number_fr(self.price_per_day)
        )
    }
}
