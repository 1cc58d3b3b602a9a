//! Tokenizer splitting raw arguments into flag occurrences and positionals.

use quarry_options::OptionSet;

use crate::ParseError;

/// One flag as it appeared on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Occurrence<'a> {
    /// Index of the selected entry in the [`OptionSet`].
    pub index: usize,
    /// `None` for a presence flag given without a value.
    pub raw: Option<&'a str>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Scan<'a> {
    pub occurrences: Vec<Occurrence<'a>>,
    pub positionals: Vec<&'a str>,
}

/// How unknown flags are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Unknown flags are an error.
    Strict,
    /// Unknown flags are skipped, as if they took no value.
    Lenient,
}

/// Split `argv` into flag occurrences and positional tokens.
///
/// - `--` ends option parsing; a lone `-` is positional.
/// - `--name=value` carries its value inline.
/// - Value-taking flags consume the following token unconditionally.
/// - `-xVALUE` attaches a value to the value-taking short flag `-x`.
pub(crate) fn scan<'a>(argv: &[&'a str], set: &OptionSet, mode: Mode) -> Result<Scan<'a>, ParseError> {
    let mut scan = Scan::default();
    let mut tokens = argv.iter().copied();
    let mut options_ended = false;

    while let Some(token) = tokens.next() {
        if options_ended || token == "-" || !token.starts_with('-') {
            scan.positionals.push(token);
            continue;
        }
        if token == "--" {
            options_ended = true;
            continue;
        }

        let (spelling, inline) = match token.split_once('=') {
            Some((flag, value)) if token.starts_with("--") => (flag, Some(value)),
            _ => (token, None),
        };

        if let Some((index, entry)) = set.lookup(spelling) {
            let raw = if entry.schema().takes_value() {
                match inline.or_else(|| tokens.next()) {
                    Some(raw) => Some(raw),
                    None => {
                        return Err(ParseError::MissingValue {
                            flag: spelling.to_string(),
                        });
                    }
                }
            } else {
                inline
            };
            scan.occurrences.push(Occurrence { index, raw });
            continue;
        }

        if let Some((index, raw)) = attached_short(token, set) {
            scan.occurrences.push(Occurrence {
                index,
                raw: Some(raw),
            });
            continue;
        }

        if mode == Mode::Strict {
            return Err(ParseError::UnrecognizedOption {
                flag: spelling.to_string(),
            });
        }
    }

    Ok(scan)
}

/// `-l10` style: a known value-taking short flag with its value attached.
fn attached_short<'a>(token: &'a str, set: &OptionSet) -> Option<(usize, &'a str)> {
    if token.starts_with("--") {
        return None;
    }
    let split = token.char_indices().nth(2)?.0;
    let (flag, rest) = token.split_at(split);
    let (index, entry) = set.lookup(flag)?;
    entry.schema().takes_value().then_some((index, rest))
}
