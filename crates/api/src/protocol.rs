//! InfoMax wire-facing types.
//!
//! The discovery payload format is plain text: candidate identifiers
//! separated by single ASCII spaces. Each candidate is a name suffix to
//! append to the consumer's origin prefix to form an element request.

use crate::*;
use bytes::Bytes;

/// Candidate tokens of this length or shorter are treated as
/// noise/placeholders and dropped while decoding a discovery payload.
pub const MAX_NOISE_TOKEN_LEN: usize = 3;

/// An interest expressed over a face for one round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The full request name.
    pub name: Name,

    /// How long the network should try to satisfy this request, in
    /// milliseconds, before the face reports a timeout.
    pub lifetime_ms: u32,

    /// Require the responding node to serve fresh content rather than
    /// stale cached entries.
    pub must_be_fresh: bool,
}

impl Request {
    /// Construct a request with the given name and lifetime, requiring
    /// freshness.
    pub fn fresh(name: Name, lifetime_ms: u32) -> Self {
        Self {
            name,
            lifetime_ms,
            must_be_fresh: true,
        }
    }
}

/// A data object returned for a request.
///
/// On delivery to a consumer the name has been normalized: the origin
/// prefix components are stripped, leaving only the suffix relevant to
/// the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The data name.
    pub name: Name,

    /// The data payload.
    pub payload: Bytes,
}

/// The exactly-once resolution of one expressed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The request was satisfied.
    Data(Response),

    /// The request lifetime elapsed without a response.
    Timeout,
}

/// Decode a discovery response payload into the ordered candidate list.
///
/// The payload is interpreted as UTF-8 text and split on single ASCII
/// spaces; tokens of length ≤ [MAX_NOISE_TOKEN_LEN] are discarded. A
/// payload that is not valid UTF-8 decodes to the empty list rather than
/// an error.
pub fn decode_candidate_list(payload: &Bytes) -> Vec<String> {
    let text = match std::str::from_utf8(payload) {
        Ok(text) => text,
        Err(_) => return Vec::new(),
    };
    text.split(' ')
        .filter(|token| token.len() > MAX_NOISE_TOKEN_LEN)
        .map(Into::into)
        .collect()
}

/// Encode a candidate list as a discovery response payload.
pub fn encode_candidate_list(candidates: &[String]) -> Bytes {
    Bytes::from(candidates.join(" "))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn happy_candidate_list_encode_decode() {
        let candidates =
            vec!["/x1/a".to_string(), "/x22/b".to_string(), "/x333".into()];
        let enc = encode_candidate_list(&candidates);
        assert_eq!(candidates, decode_candidate_list(&enc));
    }

    #[test]
    fn short_tokens_are_dropped_in_order() {
        let payload = Bytes::from_static(b"ab abcd wx abcde");
        assert_eq!(
            vec!["abcd".to_string(), "abcde".into()],
            decode_candidate_list(&payload)
        );
    }

    #[test]
    fn non_utf8_payload_decodes_to_empty_list() {
        let payload = Bytes::from_static(&[0xff, 0xfe, 0x20, 0xff]);
        assert!(decode_candidate_list(&payload).is_empty());
    }

    #[test]
    fn empty_payload_decodes_to_empty_list() {
        assert!(decode_candidate_list(&Bytes::new()).is_empty());
    }

    #[test]
    fn repeated_separators_do_not_produce_candidates() {
        let payload = Bytes::from_static(b"/x1/aa  /x2/bb");
        assert_eq!(
            vec!["/x1/aa".to_string(), "/x2/bb".into()],
            decode_candidate_list(&payload)
        );
    }
}
