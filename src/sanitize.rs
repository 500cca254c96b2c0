//! # Text Sanitizer
//!
//! Normalizes unicode punctuation into ASCII for output sinks that cannot carry
//! arbitrary unicode (narrow console encodings, some log collectors).
//!
//! The encoding of the sink is never probed globally. Callers pick an
//! [`OutputEncoding`] once at startup and hand it to the [`TextSanitizer`]
//! used for tool error messages and to the [`SanitizingMakeWriter`] used by
//! the log subscriber.

use regex::Regex;
use std::fmt::Display;
use std::io;
use std::sync::LazyLock;
use tracing_subscriber::fmt::MakeWriter;

/// Literal substitutions applied, in order, before non-ASCII stripping
const REPLACEMENTS: [(char, &str); 13] = [
    ('\u{2192}', "->"),
    ('\u{2190}', "<-"),
    ('\u{2191}', "^"),
    ('\u{2193}', "v"),
    ('\u{2022}', "*"),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201c}', "\""),
    ('\u{201d}', "\""),
    ('\u{2026}', "..."),
    ('\u{00a0}', " "),
];

static NON_ASCII_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x00-\x7F]+").expect("non-ASCII pattern is valid"));

/// Character encoding an output sink is able to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputEncoding {
    /// Any unicode text can be written as is
    #[default]
    Utf8,
    /// Only 7-bit ASCII survives
    Ascii,
}

impl OutputEncoding {
    /// Detect the encoding from the process locale (`LC_ALL`, `LC_CTYPE`, `LANG`)
    pub fn detect() -> Self {
        Self::from_locale(|key| std::env::var(key).ok())
    }

    /// Resolve the encoding from locale variables using POSIX precedence.
    ///
    /// The first non-empty variable wins. A locale that does not name UTF-8
    /// (`C`, `POSIX`, `en_US.ISO-8859-1`, ...) is treated as ASCII-only. With
    /// no locale at all the sink is assumed to be UTF-8.
    pub fn from_locale(lookup: impl Fn(&str) -> Option<String>) -> Self {
        for key in ["LC_ALL", "LC_CTYPE", "LANG"] {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                let value = value.to_ascii_lowercase();
                return if value.contains("utf-8") || value.contains("utf8") {
                    OutputEncoding::Utf8
                } else {
                    OutputEncoding::Ascii
                };
            }
        }
        OutputEncoding::Utf8
    }

    /// Whether `text` can be written to a sink with this encoding unchanged
    pub fn can_encode(&self, text: &str) -> bool {
        match self {
            OutputEncoding::Utf8 => true,
            OutputEncoding::Ascii => text.is_ascii(),
        }
    }
}

/// Sanitizes text for a sink with a fixed [`OutputEncoding`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSanitizer {
    encoding: OutputEncoding,
}

impl TextSanitizer {
    pub fn new(encoding: OutputEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> OutputEncoding {
        self.encoding
    }

    /// Make `text` safe for the configured sink.
    ///
    /// Absent text yields an empty string. Text the sink can already carry is
    /// returned unchanged, anything else goes through [`to_ascii`].
    pub fn sanitize(&self, text: Option<&str>) -> String {
        let Some(text) = text else {
            return String::new();
        };

        if self.encoding.can_encode(text) {
            text.to_string()
        } else {
            to_ascii(text)
        }
    }

    /// Stringify any displayable value, then sanitize it
    pub fn sanitize_display(&self, value: &impl Display) -> String {
        self.sanitize(Some(&value.to_string()))
    }
}

/// Replace known unicode punctuation with ASCII look-alikes and collapse every
/// remaining run of non-ASCII characters into a single space.
pub fn to_ascii(text: &str) -> String {
    let mut out = text.to_string();
    for (from, to) in REPLACEMENTS {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    NON_ASCII_RUN.replace_all(&out, " ").into_owned()
}

/// `io::Write` adapter that sanitizes everything written through it
#[derive(Debug)]
pub struct SanitizingWriter<W> {
    inner: W,
    encoding: OutputEncoding,
}

impl<W: io::Write> SanitizingWriter<W> {
    pub fn new(inner: W, encoding: OutputEncoding) -> Self {
        Self { inner, encoding }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.encoding == OutputEncoding::Utf8 {
            return self.inner.write(buf);
        }

        // The fmt layer hands over whole formatted events, so a lossy decode
        // never splits a character in practice.
        let text = String::from_utf8_lossy(buf);
        let sanitized = TextSanitizer::new(self.encoding).sanitize(Some(&text));
        self.inner.write_all(sanitized.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// [`MakeWriter`] that wraps every writer produced by `inner` in a [`SanitizingWriter`]
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    encoding: OutputEncoding,
}

impl<M> SanitizingMakeWriter<M> {
    pub fn new(inner: M, encoding: OutputEncoding) -> Self {
        Self { inner, encoding }
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer(), self.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn ascii() -> TextSanitizer {
        TextSanitizer::new(OutputEncoding::Ascii)
    }

    #[test]
    fn test_absent_text_is_empty() {
        assert_eq!(ascii().sanitize(None), "");
        assert_eq!(TextSanitizer::default().sanitize(None), "");
    }

    #[test]
    fn test_ascii_text_is_unchanged() {
        let samples = [
            "",
            "plain text",
            "Crawling error: connection refused (os error 111)",
            "tabs\tand\nnewlines  with  spaces",
            "symbols ~!@#$%^&*()_+{}|:\"<>?",
        ];
        for sample in samples {
            assert_eq!(ascii().sanitize(Some(sample)), sample);
            assert_eq!(TextSanitizer::default().sanitize(Some(sample)), sample);
        }
    }

    #[test]
    fn test_known_punctuation_is_replaced() {
        let text = "a → b ← c ↑ d ↓ • e – f — g ‘h’ “i” j… k\u{00a0}l";
        assert_eq!(
            ascii().sanitize(Some(text)),
            "a -> b <- c ^ d v * e - f -- g 'h' \"i\" j... k l"
        );
    }

    #[test]
    fn test_other_non_ascii_runs_become_one_space() {
        assert_eq!(ascii().sanitize(Some("caf\u{e9}")), "caf ");
        assert_eq!(ascii().sanitize(Some("hello 世界!")), "hello  !");
        assert_eq!(ascii().sanitize(Some("x世界y")), "x y");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "plain",
            "Error → retry… “quoted” — done",
            "émoji 🚀 rocket",
            "mixed\u{00a0}\u{2014}\u{4e16}",
        ];
        for encoding in [OutputEncoding::Ascii, OutputEncoding::Utf8] {
            let sanitizer = TextSanitizer::new(encoding);
            for sample in samples {
                let once = sanitizer.sanitize(Some(sample));
                let twice = sanitizer.sanitize(Some(&once));
                assert_eq!(once, twice, "not idempotent for {sample:?} ({encoding:?})");
            }
        }
    }

    #[test]
    fn test_utf8_sink_keeps_unicode() {
        let sanitizer = TextSanitizer::new(OutputEncoding::Utf8);
        assert_eq!(sanitizer.sanitize(Some("a → b")), "a → b");
    }

    #[test]
    fn test_sanitize_display_stringifies() {
        let err = std::io::Error::other("disk full → abort");
        assert_eq!(ascii().sanitize_display(&err), "disk full -> abort");
        assert_eq!(ascii().sanitize_display(&42), "42");
    }

    #[test]
    fn test_encoding_from_locale() {
        let lookup = |vars: &'static [(&'static str, &'static str)]| {
            let vars: HashMap<_, _> = vars.iter().copied().collect();
            move |key: &str| vars.get(key).map(|v| v.to_string())
        };

        assert_eq!(OutputEncoding::from_locale(lookup(&[])), OutputEncoding::Utf8);
        assert_eq!(
            OutputEncoding::from_locale(lookup(&[("LANG", "en_US.UTF-8")])),
            OutputEncoding::Utf8
        );
        assert_eq!(
            OutputEncoding::from_locale(lookup(&[("LANG", "C")])),
            OutputEncoding::Ascii
        );
        // LC_ALL overrides LANG
        assert_eq!(
            OutputEncoding::from_locale(lookup(&[("LC_ALL", "POSIX"), ("LANG", "C.utf8")])),
            OutputEncoding::Ascii
        );
        // Empty values are skipped
        assert_eq!(
            OutputEncoding::from_locale(lookup(&[("LC_ALL", ""), ("LC_CTYPE", "de_DE.utf8")])),
            OutputEncoding::Utf8
        );
    }

    #[test]
    fn test_sanitizing_writer() {
        let mut writer = SanitizingWriter::new(Vec::new(), OutputEncoding::Ascii);
        write!(writer, "page → skipped").unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), b"page -> skipped");

        let mut writer = SanitizingWriter::new(Vec::new(), OutputEncoding::Utf8);
        write!(writer, "page → skipped").unwrap();
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "page → skipped");
    }
}
