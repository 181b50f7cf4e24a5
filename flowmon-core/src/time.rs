use logos::{Lexer, Logos};
use std::{fmt, str::FromStr, time};

/// Internal wrapper around [`std::time::Duration`] providing the
/// human-readable rendering and parsing used across the configuration
/// surface (`"1s"`, `"500ms"`, `"1s 542ms"`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub(crate) struct Duration(time::Duration);

impl Duration {
    pub(crate) fn new(dur: time::Duration) -> Self {
        Self(dur)
    }

    #[inline]
    pub fn into_duration(self) -> time::Duration {
        self.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();
        if nanos == 0 {
            return write!(f, "0s");
        }

        let (minutes, rest) = (nanos / 60_000_000_000, nanos % 60_000_000_000);
        let (seconds, rest) = (rest / 1_000_000_000, rest % 1_000_000_000);
        let (millis, rest) = (rest / 1_000_000, rest % 1_000_000);
        let (micros, nanos) = (rest / 1_000, rest % 1_000);

        if minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        if seconds > 0 {
            write!(f, "{seconds}s")?;
        }
        if millis > 0 {
            write!(f, "{millis}ms")?;
        }
        if micros > 0 {
            write!(f, "{micros}µs")?;
        }
        if nanos > 0 {
            write!(f, "{nanos}ns")?;
        }
        Ok(())
    }
}

/// Error returned when a duration string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationParseError {
    /// The string contains a token that is neither a number nor a
    /// known unit.
    #[error("failed to parse duration from {input:?}")]
    Unrecognized { input: String },
    /// A duration component must start with a number.
    #[error("expected a duration component to start with a number in {input:?}")]
    ExpectedNumber { input: String },
    /// A number was not followed by a unit (`ns`, `us`, `ms`, `s`,
    /// `m`).
    #[error("expected a unit after {number} in {input:?}")]
    ExpectedUnit { number: u64, input: String },
    /// The numeric part does not fit in a `u64`.
    #[error("invalid number in duration {input:?}")]
    InvalidNumber { input: String },
}

impl FromStr for Duration {
    type Err = DurationParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lex = Lexer::<'_, Token>::new(s);

        let mut durations = Vec::new();

        while let Some(next) = lex.next() {
            let number: Token = next.map_err(|()| DurationParseError::Unrecognized {
                input: s.to_string(),
            })?;

            if number != Token::Value {
                return Err(DurationParseError::ExpectedNumber {
                    input: s.to_string(),
                });
            }
            let number: u64 =
                lex.slice()
                    .parse()
                    .map_err(|_| DurationParseError::InvalidNumber {
                        input: s.to_string(),
                    })?;

            let Some(Ok(measure)) = lex.next() else {
                return Err(DurationParseError::ExpectedUnit {
                    number,
                    input: s.to_string(),
                });
            };
            let duration = match measure {
                Token::NanoSeconds => time::Duration::from_nanos(number),
                Token::MicroSeconds => time::Duration::from_micros(number),
                Token::MilliSeconds => time::Duration::from_millis(number),
                Token::Seconds => time::Duration::from_secs(number),
                Token::Minutes => time::Duration::from_secs(number * 60),
                Token::Value => {
                    return Err(DurationParseError::ExpectedUnit {
                        number,
                        input: s.to_string(),
                    });
                }
            };
            durations.push(duration);
        }

        if durations.is_empty() {
            return Err(DurationParseError::ExpectedNumber {
                input: s.to_string(),
            });
        }

        Ok(Self(durations.into_iter().sum()))
    }
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\n\f]+")] // Ignore this regex pattern between tokens
enum Token {
    #[token("ns")]
    NanoSeconds,
    #[regex("us|µs|μs")]
    MicroSeconds,
    #[token("ms")]
    MilliSeconds,
    #[token("s")]
    Seconds,
    #[token("m")]
    Minutes,

    #[regex("[0-9]+")]
    Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logos_lexer() {
        let mut lex = Token::lexer("1ns");

        assert_eq!(lex.next(), Some(Ok(Token::Value)));
        assert_eq!(lex.span(), 0..1);
        assert_eq!(lex.slice(), "1");

        assert_eq!(lex.next(), Some(Ok(Token::NanoSeconds)));
        assert_eq!(lex.span(), 1..3);
        assert_eq!(lex.slice(), "ns");
    }

    #[test]
    fn parse() {
        let Duration(duration) = "123ms".parse().unwrap();
        assert_eq!(duration.as_millis(), 123);

        let Duration(duration) = "1s 2000ms 3000000us".parse().unwrap();
        assert_eq!(duration.as_secs(), 6);
    }

    #[test]
    fn display() {
        let display = |d: time::Duration| Duration::new(d).to_string();

        assert_eq!(display(time::Duration::ZERO), "0s");
        assert_eq!(display(time::Duration::from_secs(1)), "1s");
        assert_eq!(display(time::Duration::from_millis(150)), "150ms");
        assert_eq!(display(time::Duration::from_millis(1_542)), "1s542ms");
        assert_eq!(display(time::Duration::from_micros(1)), "1µs");
        assert_eq!(display(time::Duration::from_secs(90)), "1m30s");
    }

    #[test]
    fn display_round_trip() {
        for s in ["1s", "150ms", "1s542ms", "2m", "1µs"] {
            let duration: Duration = s.parse().unwrap();
            assert_eq!(duration.to_string(), s, "round-trip failed for {s}");
        }
    }

    #[test]
    fn parse_invalid() {
        assert!("150".parse::<Duration>().is_err());
        assert!("abc".parse::<Duration>().is_err());
        assert!("ms150".parse::<Duration>().is_err());
        assert!("".parse::<Duration>().is_err());
    }
}
