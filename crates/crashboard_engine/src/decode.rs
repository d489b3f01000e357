use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};

/// Incremental text decoder for chunked response bodies.
///
/// A multi-byte sequence split across chunk boundaries is held back until the
/// chunk that completes it arrives; malformed input becomes U+FFFD.
pub struct StreamDecoder {
    decoder: Decoder,
    encoding: &'static Encoding,
}

impl StreamDecoder {
    pub fn utf8() -> Self {
        Self::with_encoding(UTF_8)
    }

    /// Uses the `charset` parameter of a Content-Type header, UTF-8 otherwise.
    pub fn for_content_type(content_type: Option<&str>) -> Self {
        let encoding = content_type
            .and_then(extract_charset)
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        Self::with_encoding(encoding)
    }

    fn with_encoding(encoding: &'static Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder(),
            encoding,
        }
    }

    pub fn encoding_label(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decodes the next chunk; may return an empty string.
    pub fn feed(&mut self, bytes: &[u8]) -> String {
        self.decode(bytes, false)
    }

    /// Flushes any incomplete trailing sequence. Call once, at end of stream.
    pub fn finish(mut self) -> String {
        self.decode(&[], true)
    }

    fn decode(&mut self, mut input: &[u8], last: bool) -> String {
        let mut out = String::new();
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len() * 3 + 16);
            out.reserve(needed);
            let (result, read, _had_replacements) =
                self.decoder.decode_to_string(input, &mut out, last);
            input = &input[read..];
            match result {
                CoderResult::InputEmpty => return out,
                CoderResult::OutputFull => continue,
            }
        }
    }
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (name, value) = part.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}
