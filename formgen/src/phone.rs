/// Phone-field machinery. The actual number library is a collaborator
/// behind `PhoneNumberKit`; the engine owns only the composite-input
/// state (selected country + display text) and the commit rules.
use serde::{Deserialize, Serialize};

/// A successfully parsed number.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNumber {
    /// E.164 form, e.g. `+12025551234`.
    pub e164: String,
    /// National significant digits, e.g. `2025551234`.
    pub national: String,
    /// Country the number actually belongs to, when the library can tell.
    pub country: Option<String>,
}

/// The formatting/parsing library seam.
pub trait PhoneNumberKit {
    /// ISO 3166-1 alpha-2 codes this kit knows about.
    fn countries(&self) -> Vec<String>;

    fn calling_code(&self, country: &str) -> Option<String>;

    fn country_name(&self, country: &str) -> Option<String>;

    /// Full parse of user input assuming `default_country` when the
    /// input carries no country prefix. `None` when the input is not a
    /// recognizable number.
    fn parse(&self, input: &str, default_country: &str) -> Option<ParsedNumber>;

    /// Progressive display formatting of a partially-typed number.
    fn format_as_you_type(&self, input: &str, country: &str) -> String;
}

/// Kit used when no phone library is plugged in: knows no countries,
/// parses nothing, formats nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughKit;

impl PhoneNumberKit for PassthroughKit {
    fn countries(&self) -> Vec<String> {
        Vec::new()
    }

    fn calling_code(&self, _country: &str) -> Option<String> {
        None
    }

    fn country_name(&self, _country: &str) -> Option<String> {
        None
    }

    fn parse(&self, _input: &str, _default_country: &str) -> Option<ParsedNumber> {
        None
    }

    fn format_as_you_type(&self, input: &str, _country: &str) -> String {
        input.to_string()
    }
}

/// An edit to one half of the composite input.
#[derive(Debug, Clone, PartialEq)]
pub enum PhoneEdit {
    Country(String),
    Number(String),
}

/// What a phone edit commits upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum PhoneCommit {
    /// An E.164 number, or the raw text when parsing failed.
    Value(String),
    /// The field's empty placeholder: the number parsed but belongs to a
    /// country outside the allowlist.
    Empty,
}

/// Display state of one tel field: the selected country and the text as
/// the user sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneFieldState {
    pub country: String,
    pub national: String,
}

impl PhoneFieldState {
    pub fn new(country: &str) -> PhoneFieldState {
        PhoneFieldState {
            country: country.to_string(),
            national: String::new(),
        }
    }

    /// Apply an edit and decide what goes upstream.
    ///
    /// A full parse that lands in an allowed country commits the E.164
    /// form and adopts that country's formatting; a parse into a
    /// disallowed country commits the empty placeholder; a failed parse
    /// passes the raw text through for schema validation to flag.
    /// An open, unmatched parenthesis suppresses reformatting so the
    /// user can edit a formatted group without the formatter fighting
    /// back.
    pub fn apply(
        &mut self,
        edit: PhoneEdit,
        kit: &dyn PhoneNumberKit,
        allowed_countries: &[String],
    ) -> PhoneCommit {
        let (mut country, mut number) = match edit {
            PhoneEdit::Country(c) => (c, self.national.clone()),
            PhoneEdit::Number(n) => (self.country.clone(), n),
        };

        let commit = match kit.parse(&number, &country) {
            Some(parsed) => {
                let allowed = parsed
                    .country
                    .as_deref()
                    .map(|c| is_allowed(c, allowed_countries))
                    .unwrap_or(false);

                if let Some(parsed_country) = &parsed.country {
                    if *parsed_country != country {
                        if allowed {
                            country = parsed_country.clone();
                        }
                        number = parsed.national.clone();
                    }
                }

                if allowed {
                    PhoneCommit::Value(parsed.e164)
                } else {
                    PhoneCommit::Empty
                }
            }
            None => PhoneCommit::Value(number.clone()),
        };

        if !(number.contains('(') && !number.contains(')')) {
            number = kit.format_as_you_type(&number, &country);
        }

        self.country = country;
        self.national = number;
        commit
    }
}

fn is_allowed(country: &str, allowed: &[String]) -> bool {
    allowed.is_empty() || allowed.iter().any(|c| c == country)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Minimal single-country kit: US numbers only, ten digits.
    struct UsKit;

    fn digits(s: &str) -> String {
        s.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    impl PhoneNumberKit for UsKit {
        fn countries(&self) -> Vec<String> {
            vec!["US".into()]
        }

        fn calling_code(&self, country: &str) -> Option<String> {
            (country == "US").then(|| "1".to_string())
        }

        fn country_name(&self, country: &str) -> Option<String> {
            (country == "US").then(|| "United States".to_string())
        }

        fn parse(&self, input: &str, _default_country: &str) -> Option<ParsedNumber> {
            let d = digits(input);
            let national = match d.len() {
                10 => d,
                11 if d.starts_with('1') => d[1..].to_string(),
                _ => return None,
            };
            Some(ParsedNumber {
                e164: format!("+1{national}"),
                national,
                country: Some("US".into()),
            })
        }

        fn format_as_you_type(&self, input: &str, _country: &str) -> String {
            let d = digits(input);
            if d.len() == 10 {
                format!("({}) {}-{}", &d[..3], &d[3..6], &d[6..])
            } else {
                input.to_string()
            }
        }
    }

    #[test]
    fn test_full_number_commits_e164_and_reformats() {
        let mut state = PhoneFieldState::new("US");
        let commit = state.apply(PhoneEdit::Number("2025551234".into()), &UsKit, &[]);
        assert_eq!(commit, PhoneCommit::Value("+12025551234".into()));
        assert_eq!(state.national, "(202) 555-1234");
        assert_eq!(state.country, "US");
    }

    #[test]
    fn test_parse_failure_passes_raw_text_through() {
        let mut state = PhoneFieldState::new("US");
        let commit = state.apply(PhoneEdit::Number("555".into()), &UsKit, &[]);
        assert_eq!(commit, PhoneCommit::Value("555".into()));
        assert_eq!(state.national, "555");
    }

    #[test]
    fn test_open_parenthesis_suppresses_reformat() {
        let mut state = PhoneFieldState::new("US");
        state.apply(PhoneEdit::Number("2025551234".into()), &UsKit, &[]);
        // Backspacing a formatted group must not snap back.
        let commit = state.apply(PhoneEdit::Number("(202".into()), &UsKit, &[]);
        assert_eq!(commit, PhoneCommit::Value("(202".into()));
        assert_eq!(state.national, "(202");
    }

    #[test]
    fn test_disallowed_country_commits_empty() {
        let mut state = PhoneFieldState::new("US");
        let commit = state.apply(
            PhoneEdit::Number("2025551234".into()),
            &UsKit,
            &["AU".to_string()],
        );
        assert_eq!(commit, PhoneCommit::Empty);
    }

    #[test]
    fn test_country_edit_keeps_number() {
        let mut state = PhoneFieldState::new("US");
        state.apply(PhoneEdit::Number("555".into()), &UsKit, &[]);
        state.apply(PhoneEdit::Country("US".into()), &UsKit, &[]);
        assert_eq!(state.country, "US");
        assert_eq!(state.national, "555");
    }

    #[test]
    fn test_passthrough_kit_never_parses() {
        let mut state = PhoneFieldState::new("US");
        let commit = state.apply(PhoneEdit::Number("2025551234".into()), &PassthroughKit, &[]);
        assert_eq!(commit, PhoneCommit::Value("2025551234".into()));
        assert_eq!(state.national, "2025551234");
    }
}
