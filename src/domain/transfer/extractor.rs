//! Heuristic extraction of a transfer instruction from free text

use crate::domain::error::ExtractionError;

use super::amount::{Amount, CHEON, MAN};
use super::request::TransferRequest;

/// Particles marking the recipient ("to <name>")
const RECIPIENT_PARTICLES: &[&str] = &["에게", "한테", "께"];

/// Verb stem that must follow the amount in "<name> <amount>원 보내"
const SEND_VERB: &str = "보내";

/// Object markers allowed right after an amount ("10만원을")
const OBJECT_MARKERS: &[char] = &['을', '를'];

/// Honorific suffix stripped from recipient names
const HONORIFIC: char = '님';

/// Surface forms the extractor recognizes, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPattern {
    /// `<name>에게 <amount>원`
    RecipientFirst,
    /// `<name> <amount>원 보내`
    RecipientThenSend,
    /// `<amount>원을 <name>에게`
    AmountFirst,
}

impl TransferPattern {
    /// Fixed priority used by the default extractor
    pub const PRIORITY: [TransferPattern; 3] = [
        TransferPattern::RecipientFirst,
        TransferPattern::RecipientThenSend,
        TransferPattern::AmountFirst,
    ];

    /// Find the leftmost structural match of this pattern
    fn find(&self, chars: &[char]) -> Option<Capture> {
        match self {
            Self::RecipientFirst => find_recipient_first(chars),
            Self::RecipientThenSend => find_recipient_then_send(chars),
            Self::AmountFirst => find_amount_first(chars),
        }
    }
}

/// One `<digits><unit>` group of an amount ("1만", "5천", "3천만")
#[derive(Debug, Clone, PartialEq, Eq)]
struct AmountTerm {
    numeral: String,
    multiplier: u64,
}

/// Amount as written, split into groups of strictly descending magnitude
#[derive(Debug, Clone, PartialEq, Eq)]
struct AmountToken {
    written: String,
    terms: Vec<AmountTerm>,
    /// False when a group breaks the descending order or trails without a unit
    well_formed: bool,
}

impl AmountToken {
    fn normalize(&self) -> Result<Amount, ExtractionError> {
        let invalid = || ExtractionError::InvalidAmount(self.written.clone());
        if !self.well_formed {
            return Err(invalid());
        }

        let mut won: u64 = 0;
        for term in &self.terms {
            let digits: String = term.numeral.chars().filter(|c| *c != ',').collect();
            let value: u64 = digits.parse().map_err(|_| invalid())?;
            let part = value.checked_mul(term.multiplier).ok_or_else(invalid)?;
            won = won.checked_add(part).ok_or_else(invalid)?;
        }
        Amount::new(won).ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Capture {
    recipient: String,
    amount: AmountToken,
}

/// Turns recognized speech into a draft transfer request.
///
/// Patterns are tried in order and the first one that matches decides the
/// outcome; there is no scoring across patterns. Korean numeral words
/// ("삼만원") are not recognized.
#[derive(Debug, Clone)]
pub struct TransferExtractor {
    patterns: Vec<TransferPattern>,
}

impl TransferExtractor {
    /// Create an extractor with the default pattern priority
    pub fn new() -> Self {
        Self {
            patterns: TransferPattern::PRIORITY.to_vec(),
        }
    }

    /// Create an extractor with a custom pattern order
    pub fn with_patterns(patterns: impl Into<Vec<TransferPattern>>) -> Self {
        Self {
            patterns: patterns.into(),
        }
    }

    /// Extract a draft transfer from free text
    pub fn extract(&self, text: &str) -> Result<TransferRequest, ExtractionError> {
        let chars: Vec<char> = text.trim().chars().collect();

        let capture = self
            .patterns
            .iter()
            .find_map(|pattern| pattern.find(&chars))
            .ok_or(ExtractionError::NoMatch)?;

        let amount = capture.amount.normalize()?;
        Ok(TransferRequest::new(capture.recipient, amount))
    }
}

impl Default for TransferExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_hangul(ch: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&ch)
}

/// End index of `word` if it occurs at `at`
fn word_at(chars: &[char], at: usize, word: &str) -> Option<usize> {
    let mut end = at;
    for expected in word.chars() {
        if chars.get(end) != Some(&expected) {
            return None;
        }
        end += 1;
    }
    Some(end)
}

fn particle_at(chars: &[char], at: usize) -> Option<usize> {
    RECIPIENT_PARTICLES
        .iter()
        .find_map(|particle| word_at(chars, at, particle))
}

fn skip_whitespace(chars: &[char], mut at: usize) -> usize {
    while chars.get(at).is_some_and(|c| c.is_whitespace()) {
        at += 1;
    }
    at
}

fn recipient_name(chars: &[char]) -> Option<String> {
    let name = match chars.split_last() {
        Some((&HONORIFIC, rest)) if !rest.is_empty() => rest,
        _ => chars,
    };
    if name.is_empty() {
        None
    } else {
        Some(name.iter().collect())
    }
}

/// Digit run (with `,` separators) starting at `at`
fn scan_digits(chars: &[char], at: usize) -> Option<(String, usize)> {
    if !chars.get(at).is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut end = at;
    while chars.get(end).is_some_and(|c| c.is_ascii_digit() || *c == ',') {
        end += 1;
    }
    Some((chars[at..end].iter().collect(), end))
}

/// Scan `<digits>[천만|만|천]` groups followed by an optional `원`.
///
/// Groups are summed ("1만5천원" is 15,000; "3천만원" is 30,000,000) and
/// must descend in magnitude. A lone digit run needs `원`; without any unit
/// word there is no match. Groups out of order, or a trailing digit run or
/// unit word that does not complete the amount, make the token malformed.
fn scan_amount(chars: &[char], at: usize) -> Option<(AmountToken, usize)> {
    let mut terms: Vec<AmountTerm> = Vec::new();
    let mut cursor = at;
    let mut well_formed = true;

    while let Some((numeral, digits_end)) = scan_digits(chars, cursor) {
        let unit_at = skip_whitespace(chars, digits_end);
        let (multiplier, unit_end) = match (chars.get(unit_at), chars.get(unit_at + 1)) {
            (Some('천'), Some('만')) => (CHEON * MAN, unit_at + 2),
            (Some('만'), _) => (MAN, unit_at + 1),
            (Some('천'), _) => (CHEON, unit_at + 1),
            _ => (1, digits_end),
        };

        if terms.last().is_some_and(|prev| multiplier >= prev.multiplier) {
            well_formed = false;
        }
        terms.push(AmountTerm { numeral, multiplier });
        cursor = unit_end;

        if multiplier == 1 || !well_formed {
            break;
        }
        let next = skip_whitespace(chars, cursor);
        if !chars.get(next).is_some_and(|c| c.is_ascii_digit()) {
            break;
        }
        cursor = next;
    }

    let last = terms.last()?;
    let won_at = skip_whitespace(chars, cursor);
    let has_won = chars.get(won_at) == Some(&'원');

    if !has_won {
        if last.multiplier == 1 {
            if terms.len() == 1 {
                return None;
            }
            well_formed = false;
        }
        // "3천 만원": a unit word split off from its group
        if matches!(chars.get(won_at), Some('만' | '천')) {
            well_formed = false;
        }
    }

    let end = if has_won { won_at + 1 } else { cursor };
    let written = chars[at..end].iter().collect::<String>().trim().to_string();

    Some((
        AmountToken {
            written,
            terms,
            well_formed,
        },
        end,
    ))
}

fn find_recipient_first(chars: &[char]) -> Option<Capture> {
    (1..chars.len()).find_map(|at| {
        let after_particle = particle_at(chars, at)?;

        let mut start = at;
        while start > 0 && is_hangul(chars[start - 1]) {
            start -= 1;
        }
        let recipient = recipient_name(&chars[start..at])?;

        let (amount, _) = scan_amount(chars, skip_whitespace(chars, after_particle))?;
        Some(Capture { recipient, amount })
    })
}

fn find_recipient_then_send(chars: &[char]) -> Option<Capture> {
    (0..chars.len()).find_map(|start| {
        if !is_hangul(chars[start]) || (start > 0 && is_hangul(chars[start - 1])) {
            return None;
        }

        let mut end = start;
        while chars.get(end).is_some_and(|c| is_hangul(*c)) {
            end += 1;
        }

        let amount_at = skip_whitespace(chars, end);
        if amount_at == end {
            return None;
        }

        let (amount, after_amount) = scan_amount(chars, amount_at)?;
        word_at(chars, skip_whitespace(chars, after_amount), SEND_VERB)?;

        let recipient = recipient_name(&chars[start..end])?;
        Some(Capture { recipient, amount })
    })
}

fn find_amount_first(chars: &[char]) -> Option<Capture> {
    (0..chars.len()).find_map(|at| {
        if at > 0 && (chars[at - 1].is_ascii_digit() || chars[at - 1] == ',') {
            return None;
        }

        let (amount, mut after_amount) = scan_amount(chars, at)?;
        if chars
            .get(after_amount)
            .is_some_and(|c| OBJECT_MARKERS.contains(c))
        {
            after_amount += 1;
        }

        let start = skip_whitespace(chars, after_amount);
        let mut end = start;
        while chars.get(end).is_some_and(|c| is_hangul(*c)) {
            end += 1;
        }

        // Greedy name: the last particle inside the run ends it
        let particle = (start + 1..end)
            .rev()
            .find(|p| particle_at(chars, *p).is_some())?;

        let recipient = recipient_name(&chars[start..particle])?;
        Some(Capture { recipient, amount })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Result<TransferRequest, ExtractionError> {
        TransferExtractor::new().extract(text)
    }

    #[test]
    fn recipient_first_with_man() {
        let draft = extract("홍길동에게 10만원").unwrap();
        assert_eq!(draft.recipient_name(), "홍길동");
        assert_eq!(draft.amount().won(), 100_000);
        assert!(draft.from_account().is_none());
    }

    #[test]
    fn man_multiplier_holds_for_any_name_and_count() {
        for name in ["김철수", "이영희", "박", "남궁민수"] {
            for n in [1u64, 3, 10, 25, 999] {
                let text = format!("{}에게 {}만원", name, n);
                let draft = extract(&text).unwrap();
                assert_eq!(draft.recipient_name(), name, "{}", text);
                assert_eq!(draft.amount().won(), n * 10_000, "{}", text);
            }
        }
    }

    #[test]
    fn cheon_and_bare_won() {
        assert_eq!(extract("김철수에게 5천원").unwrap().amount().won(), 5_000);
        assert_eq!(extract("김철수에게 3500원").unwrap().amount().won(), 3_500);
    }

    #[test]
    fn unit_without_won_suffix() {
        assert_eq!(extract("김철수에게 2만 보내줘").unwrap().amount().won(), 20_000);
    }

    #[test]
    fn thousands_separators_are_accepted() {
        assert_eq!(extract("홍길동에게 10,000원").unwrap().amount().won(), 10_000);
    }

    #[test]
    fn alternate_particles_and_honorific() {
        assert_eq!(extract("엄마한테 3만원").unwrap().recipient_name(), "엄마");
        assert_eq!(extract("선생님께 5만원").unwrap().recipient_name(), "선생");
        assert_eq!(extract("홍길동님에게 1만원").unwrap().recipient_name(), "홍길동");
    }

    #[test]
    fn recipient_then_send() {
        let draft = extract("김철수 5만원 보내줘").unwrap();
        assert_eq!(draft.recipient_name(), "김철수");
        assert_eq!(draft.amount().won(), 50_000);
    }

    #[test]
    fn recipient_then_amount_needs_send_verb() {
        assert_eq!(extract("김철수 5만원"), Err(ExtractionError::NoMatch));
    }

    #[test]
    fn amount_first() {
        let draft = extract("3만원을 이영희에게 보내").unwrap();
        assert_eq!(draft.recipient_name(), "이영희");
        assert_eq!(draft.amount().won(), 30_000);
    }

    #[test]
    fn amount_first_without_object_marker() {
        let draft = extract("7천원 박민수한테").unwrap();
        assert_eq!(draft.recipient_name(), "박민수");
        assert_eq!(draft.amount().won(), 7_000);
    }

    #[test]
    fn hangul_numerals_are_not_recognized() {
        assert_eq!(extract("이영희에게 삼만원 이체"), Err(ExtractionError::NoMatch));
    }

    #[test]
    fn unrelated_text_does_not_match() {
        assert_eq!(extract("완전히 무관한 문장"), Err(ExtractionError::NoMatch));
        assert_eq!(extract(""), Err(ExtractionError::NoMatch));
    }

    #[test]
    fn missing_unit_does_not_guess() {
        assert_eq!(extract("홍길동에게 100"), Err(ExtractionError::NoMatch));
    }

    #[test]
    fn zero_amount_is_invalid() {
        assert!(matches!(
            extract("홍길동에게 0원"),
            Err(ExtractionError::InvalidAmount(_))
        ));
    }

    #[test]
    fn overflowing_amount_is_invalid() {
        assert!(matches!(
            extract("홍길동에게 99999999999999999999만원"),
            Err(ExtractionError::InvalidAmount(_))
        ));
        assert!(matches!(
            extract("홍길동에게 1844674407370956만원"),
            Err(ExtractionError::InvalidAmount(_))
        ));
    }

    #[test]
    fn cheon_man_is_tens_of_millions() {
        assert_eq!(extract("홍길동에게 3천만원").unwrap().amount().won(), 30_000_000);
    }

    #[test]
    fn compound_groups_are_summed() {
        assert_eq!(extract("홍길동에게 1만5천원").unwrap().amount().won(), 15_000);
        assert_eq!(extract("홍길동에게 10만 5천원").unwrap().amount().won(), 105_000);
        assert_eq!(extract("홍길동에게 1만5000원").unwrap().amount().won(), 15_000);
        assert_eq!(extract("홍길동에게 2천만 3천원").unwrap().amount().won(), 20_003_000);
    }

    #[test]
    fn compound_amount_first() {
        let draft = extract("1만5천원을 이영희에게 보내").unwrap();
        assert_eq!(draft.recipient_name(), "이영희");
        assert_eq!(draft.amount().won(), 15_000);
    }

    #[test]
    fn ascending_groups_are_invalid() {
        assert_eq!(
            extract("홍길동에게 5천 2만원"),
            Err(ExtractionError::InvalidAmount("5천 2만원".to_string()))
        );
        assert!(matches!(
            extract("홍길동에게 1만 2만원"),
            Err(ExtractionError::InvalidAmount(_))
        ));
    }

    #[test]
    fn unfinished_compound_is_invalid() {
        assert!(matches!(
            extract("홍길동에게 1만 5 보내줘"),
            Err(ExtractionError::InvalidAmount(_))
        ));
        assert!(matches!(
            extract("홍길동에게 2천5백원"),
            Err(ExtractionError::InvalidAmount(_))
        ));
        assert!(matches!(
            extract("홍길동에게 3천 만원"),
            Err(ExtractionError::InvalidAmount(_))
        ));
    }

    #[test]
    fn man_after_won_is_a_particle() {
        // "5만원만" reads "only 50,000 won"
        assert_eq!(extract("엄마에게 5만원만 보내줘").unwrap().amount().won(), 50_000);
    }

    #[test]
    fn first_pattern_wins() {
        // Both the particle form and the send-verb form fit; the particle form has priority
        let draft = extract("홍길동에게 1만원 김철수 2만원 보내").unwrap();
        assert_eq!(draft.recipient_name(), "홍길동");
        assert_eq!(draft.amount().won(), 10_000);
    }

    #[test]
    fn custom_priority_changes_winner() {
        let extractor = TransferExtractor::with_patterns(vec![
            TransferPattern::RecipientThenSend,
            TransferPattern::RecipientFirst,
        ]);
        let draft = extractor.extract("홍길동에게 1만원 김철수 2만원 보내").unwrap();
        assert_eq!(draft.recipient_name(), "김철수");
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "홍길동에게 10만원 보내줘";
        assert_eq!(extract(text), extract(text));
    }

    #[test]
    fn surrounding_text_is_ignored() {
        let draft = extract("음 그러니까 홍길동에게 2만원 부탁해").unwrap();
        assert_eq!(draft.recipient_name(), "홍길동");
        assert_eq!(draft.amount().won(), 20_000);
    }
}
