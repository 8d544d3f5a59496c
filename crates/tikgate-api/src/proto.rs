//! RouterOS API sentence framing.
//!
//! The API speaks "sentences": sequences of length-prefixed "words",
//! terminated by a zero-length word. The length prefix is variable-width:
//!
//! | length range              | prefix bytes | marker bits   |
//! |---------------------------|--------------|---------------|
//! | `0x00 ..= 0x7F`           | 1            | `0xxxxxxx`    |
//! | `0x80 ..= 0x3FFF`         | 2            | `10xxxxxx`    |
//! | `0x4000 ..= 0x1F_FFFF`    | 3            | `110xxxxx`    |
//! | `0x20_0000 ..= 0xFFF_FFFF`| 4            | `1110xxxx`    |
//! | larger                    | 5            | `0xF0` + u32  |
//!
//! [`SentenceCodec`] plugs into `tokio_util::codec::Framed`; [`Reply`]
//! classifies a decoded sentence (`!re`, `!done`, `!trap`, `!fatal`).

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::Error;
use crate::record::Record;

/// Upper bound on a single word. Devices never send anything close to
/// this; a larger prefix means the stream is out of sync.
const MAX_WORD_LEN: usize = 16 * 1024 * 1024;

// ── Sentence ─────────────────────────────────────────────────────────

/// An ordered list of words (without the terminating empty word).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    words: Vec<String>,
}

impl Sentence {
    /// Start a sentence with a command word, e.g. `/ip/address/print`.
    pub fn command(word: impl Into<String>) -> Self {
        Self {
            words: vec![word.into()],
        }
    }

    /// Append an `=key=value` attribute word.
    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.words.push(format!("={key}={value}"));
        self
    }

    /// Append a raw word.
    pub fn word(mut self, word: impl Into<String>) -> Self {
        self.words.push(word.into());
        self
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The leading word (command or reply type).
    pub fn head(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }
}

impl From<Vec<String>> for Sentence {
    fn from(words: Vec<String>) -> Self {
        Self { words }
    }
}

// ── Length prefix ────────────────────────────────────────────────────

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn encode_length(len: usize, dst: &mut BytesMut) -> Result<(), Error> {
    let len = u32::try_from(len).map_err(|_| Error::Protocol(format!("word too long: {len}")))?;
    match len {
        0..=0x7F => dst.put_u8(len as u8),
        0x80..=0x3FFF => dst.put_u16(len as u16 | 0x8000),
        0x4000..=0x1F_FFFF => {
            let v = len | 0x00C0_0000;
            dst.put_u8((v >> 16) as u8);
            dst.put_u16(v as u16);
        }
        0x20_0000..=0x0FFF_FFFF => dst.put_u32(len | 0xE000_0000),
        _ => {
            dst.put_u8(0xF0);
            dst.put_u32(len);
        }
    }
    Ok(())
}

/// Peek a length prefix at the start of `buf`.
///
/// Returns `(prefix_width, word_len)` or `None` if more bytes are needed.
fn decode_length(buf: &[u8]) -> Result<Option<(usize, usize)>, Error> {
    let Some(&first) = buf.first() else {
        return Ok(None);
    };

    let (width, initial) = match first {
        b if b & 0x80 == 0x00 => (1, u32::from(b)),
        b if b & 0xC0 == 0x80 => (2, u32::from(b & 0x3F)),
        b if b & 0xE0 == 0xC0 => (3, u32::from(b & 0x1F)),
        b if b & 0xF0 == 0xE0 => (4, u32::from(b & 0x0F)),
        0xF0 => (5, 0),
        b => return Err(Error::Protocol(format!("reserved length prefix 0x{b:02X}"))),
    };

    let Some(rest) = buf.get(1..width) else {
        return Ok(None);
    };
    let len = rest
        .iter()
        .fold(initial, |acc, byte| (acc << 8) | u32::from(*byte));
    let len = usize::try_from(len).map_err(|_| Error::Protocol("length overflow".into()))?;

    if len > MAX_WORD_LEN {
        return Err(Error::Protocol(format!("word length {len} exceeds limit")));
    }
    Ok(Some((width, len)))
}

// ── Codec ────────────────────────────────────────────────────────────

/// `tokio_util` codec turning a byte stream into [`Sentence`]s and back.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceCodec;

impl Decoder for SentenceCodec {
    type Item = Sentence;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Sentence>, Error> {
        // Scan without consuming until a full sentence is buffered.
        let mut offset = 0;
        let mut spans = Vec::new();
        loop {
            let Some((width, len)) = decode_length(src.get(offset..).unwrap_or_default())? else {
                src.reserve(8);
                return Ok(None);
            };
            let start = offset + width;
            if len == 0 {
                offset = start;
                break;
            }
            if src.len() < start + len {
                src.reserve(start + len - src.len());
                return Ok(None);
            }
            spans.push((start, len));
            offset = start + len;
        }

        let frame = src.split_to(offset);
        let words = spans
            .into_iter()
            .map(|(start, len)| {
                String::from_utf8_lossy(frame.get(start..start + len).unwrap_or_default())
                    .into_owned()
            })
            .collect::<Vec<_>>();
        Ok(Some(Sentence::from(words)))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Sentence>, Error> {
        match self.decode(buf)? {
            Some(sentence) => Ok(Some(sentence)),
            None if buf.is_empty() => Ok(None),
            None => {
                buf.advance(buf.len());
                Err(Error::Closed)
            }
        }
    }
}

impl Encoder<Sentence> for SentenceCodec {
    type Error = Error;

    fn encode(&mut self, item: Sentence, dst: &mut BytesMut) -> Result<(), Error> {
        for word in item.words {
            encode_length(word.len(), dst)?;
            dst.put_slice(word.as_bytes());
        }
        dst.put_u8(0);
        Ok(())
    }
}

// ── Reply ────────────────────────────────────────────────────────────

/// A classified reply sentence from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// One result record.
    Re(Record),
    /// End of the reply stream (may carry `=ret=` style attributes).
    Done(Record),
    /// Command rejected; a `!done` still follows.
    Trap {
        category: Option<u32>,
        message: String,
    },
    /// Connection-level failure; the device closes the socket next.
    Fatal(String),
    /// RouterOS 7 short-hand for "no results"; a `!done` follows.
    Empty,
}

/// Split an `=key=value` word. Words without a leading `=` (such as
/// `.tag=3`) are not attributes.
fn parse_attribute(word: &str) -> Option<(&str, &str)> {
    let body = word.strip_prefix('=')?;
    Some(body.split_once('=').unwrap_or((body, "")))
}

impl TryFrom<Sentence> for Reply {
    type Error = Error;

    fn try_from(sentence: Sentence) -> Result<Self, Error> {
        let mut words = sentence.words.into_iter();
        let head = words
            .next()
            .ok_or_else(|| Error::Protocol("empty reply sentence".into()))?;

        let record = |words: std::vec::IntoIter<String>| -> Record {
            words
                .filter_map(|w| parse_attribute(&w).map(|(k, v)| (k.to_owned(), v.to_owned())))
                .collect()
        };

        match head.as_str() {
            "!re" => Ok(Self::Re(record(words))),
            "!done" => Ok(Self::Done(record(words))),
            "!empty" => Ok(Self::Empty),
            "!trap" => {
                let attrs = record(words);
                Ok(Self::Trap {
                    category: attrs.get("category").and_then(|c| c.parse().ok()),
                    message: attrs.get("message").unwrap_or("unknown error").to_owned(),
                })
            }
            "!fatal" => {
                let message = words.collect::<Vec<_>>().join(" ");
                Ok(Self::Fatal(message))
            }
            other => Err(Error::Protocol(format!("unexpected reply word {other:?}"))),
        }
    }
}
