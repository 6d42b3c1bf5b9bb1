use std::ffi::OsString;
use std::time::Duration;

use clap::{arg, Command};

use crate::host::Host;
use crate::{secret, Options, TotpError, TOTP};

pub const USAGE: &str = "first and only parameter must be your secret (b32)";

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Wrong argument count, usage was printed.
    Usage,
    /// The code was copied and printed.
    Copied(String),
}

/// The argument parser. The secret is always handed to it behind `--`, see [run].
pub fn command() -> Command<'static> {
    Command::new("totp-clip")
        .about("Copy the current TOTP code of a base32 secret to the clipboard")
        .disable_help_flag(true)
        .arg(
            arg!(<SECRET> "Base32 shared secret, unpadded")
                .required(true)
                .allow_hyphen_values(true),
        )
}

/// Runs the whole invocation: parse, generate, copy, print, hold.
///
/// # Errors
///
/// Will return an error if the secret isn't base32, decodes to an empty key, or the
/// clipboard can't be written. Anything but exactly one argument is not an error, see
/// [Outcome::Usage]. That one argument is always the secret, even `--` or `--help`.
pub fn run<I, T, H>(args: I, host: &mut H, options: &Options) -> Result<Outcome, TotpError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    H: Host,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let (program, secret) = match args.as_slice() {
        [program, secret] => (program.clone(), secret.clone()),
        _ => {
            log::debug!("expected one argument, got {}", args.len().saturating_sub(1));
            host.write_line(USAGE);
            return Ok(Outcome::Usage);
        }
    };

    // past `--` clap takes every value literally, only non UTF-8 input is refused
    let parsed = command().try_get_matches_from([program, OsString::from("--"), secret]);
    let matches = match parsed {
        Ok(matches) => matches,
        Err(e) => {
            log::debug!("argument error: {:?}", e.kind());
            host.write_line(USAGE);
            return Ok(Outcome::Usage);
        }
    };
    let secret = matches.value_of("SECRET").unwrap_or_default();

    let now = host.now_millis();
    let totp = TOTP::new(secret::decode(secret)?)?;
    let token = totp.generate(now.saturating_add(millis(options.look_ahead)))?;

    host.set_clipboard_text(&token.code)?;
    host.write_line(&format!(
        "Secret code (clipboard) = {}, change in {} seconds",
        token.code,
        crate::remaining_seconds(now)
    ));

    log::debug!("holding the clipboard for {:?}", options.hold);
    host.sleep(options.hold);
    Ok(Outcome::Copied(token.code))
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockHost {
        now: u64,
        clipboard: Option<String>,
        clipboard_fails: bool,
        slept: Vec<Duration>,
        out: Vec<String>,
    }

    impl MockHost {
        fn new(now: u64) -> Self {
            MockHost {
                now,
                clipboard: None,
                clipboard_fails: false,
                slept: Vec::new(),
                out: Vec::new(),
            }
        }
    }

    impl Host for MockHost {
        fn now_millis(&self) -> u64 {
            self.now
        }

        fn set_clipboard_text(&mut self, text: &str) -> Result<(), TotpError> {
            if self.clipboard_fails {
                return Err(TotpError::Clipboard("no display".to_string()));
            }
            self.clipboard = Some(text.to_string());
            Ok(())
        }

        fn sleep(&mut self, duration: Duration) {
            self.slept.push(duration);
        }

        fn write_line(&mut self, line: &str) {
            self.out.push(line.to_string());
        }
    }

    const T: u64 = 1_700_000_000_000;

    #[test]
    fn copies_and_prints_code() {
        let mut host = MockHost::new(T);
        let outcome = run(
            ["totp-clip", "ABCDEFGHIJKLMNOP"],
            &mut host,
            &Options::default(),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Copied("541083".to_string()));
        assert_eq!(host.clipboard.as_deref(), Some("541083"));
        assert_eq!(
            host.out,
            vec!["Secret code (clipboard) = 541083, change in 10 seconds".to_string()]
        );
        assert_eq!(host.slept, vec![Duration::from_millis(8000)]);
    }

    #[test]
    fn code_is_computed_ahead_of_the_clock() {
        // 29s into the step: the look-ahead already lands in the next one
        let mut host = MockHost::new(1_111_111_109_000);
        let options = Options::default().hold(Duration::ZERO);
        run(
            ["totp-clip", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"],
            &mut host,
            &options,
        )
        .unwrap();

        assert_eq!(host.clipboard.as_deref(), Some("050471"));
        assert_eq!(
            host.out,
            vec!["Secret code (clipboard) = 050471, change in 1 seconds".to_string()]
        );
    }

    #[test]
    fn same_time_same_code() {
        let options = Options::default().hold(Duration::ZERO);
        let mut first = MockHost::new(T);
        let mut second = MockHost::new(T);
        let a = run(["totp-clip", "abcdefghijklmnop"], &mut first, &options).unwrap();
        let b = run(["totp-clip", "ABCDEFGHIJKLMNOP"], &mut second, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn usage_without_argument() {
        let mut host = MockHost::new(T);
        let outcome = run(["totp-clip"], &mut host, &Options::default()).unwrap();

        assert_eq!(outcome, Outcome::Usage);
        assert_eq!(host.out, vec![USAGE.to_string()]);
        assert!(host.clipboard.is_none());
        assert!(host.slept.is_empty());
    }

    #[test]
    fn usage_with_extra_arguments() {
        let mut host = MockHost::new(T);
        let outcome = run(
            ["totp-clip", "ABCDEFGH", "IJKLMNOP"],
            &mut host,
            &Options::default(),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Usage);
        assert_eq!(host.out, vec![USAGE.to_string()]);
    }

    #[test]
    fn usage_with_separator_and_secret() {
        let mut host = MockHost::new(T);
        let outcome = run(
            ["totp-clip", "--", "ABCDEFGHIJKLMNOP"],
            &mut host,
            &Options::default(),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Usage);
        assert_eq!(host.out, vec![USAGE.to_string()]);
        assert!(host.clipboard.is_none());
        assert!(host.slept.is_empty());
    }

    #[test]
    fn hyphen_secret_reaches_the_decoder() {
        for secret in ["-AB", "--help", "--", "-h"] {
            let mut host = MockHost::new(T);
            let err = run(["totp-clip", secret], &mut host, &Options::default()).unwrap_err();

            assert_eq!(
                err,
                TotpError::InvalidInput(crate::SecretParseError::InvalidCharacter('-')),
                "secret {:?}",
                secret
            );
            assert!(host.out.is_empty());
            assert!(host.clipboard.is_none());
        }
    }

    #[test]
    fn invalid_secret_is_an_error() {
        let mut host = MockHost::new(T);
        let err = run(["totp-clip", "ABCDEFG1"], &mut host, &Options::default()).unwrap_err();

        assert_eq!(
            err,
            TotpError::InvalidInput(crate::SecretParseError::InvalidCharacter('1'))
        );
        assert!(host.clipboard.is_none());
        assert!(host.out.is_empty());
    }

    #[test]
    fn empty_secret_is_crypto_error() {
        let mut host = MockHost::new(T);
        let err = run(["totp-clip", ""], &mut host, &Options::default()).unwrap_err();
        assert!(matches!(err, TotpError::Crypto(_)));
    }

    #[test]
    fn clipboard_failure_stops_the_run() {
        let mut host = MockHost::new(T);
        host.clipboard_fails = true;
        let err = run(
            ["totp-clip", "ABCDEFGHIJKLMNOP"],
            &mut host,
            &Options::default(),
        )
        .unwrap_err();

        assert!(matches!(err, TotpError::Clipboard(_)));
        assert!(host.out.is_empty());
        assert!(host.slept.is_empty());
    }
}
