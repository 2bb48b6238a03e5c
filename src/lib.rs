//! Building blocks for parsing and emitting HTTP/1.x wire traffic:
//! multi-valued headers, an 8-bit-clean byte string substrate, HTTP-date
//! codecs, RFC 6265 cookies and a CORS preflight decision helper.

pub mod byte_string;
pub mod char_sequence;
pub mod combined_headers;
pub mod cookie;
pub mod cors;
pub mod date;
pub mod error;
pub mod header_map;
pub mod value_converter;

pub use byte_string::ByteString;
pub use char_sequence::CharSequence;
pub use combined_headers::CombinedHeaders;
pub use cookie::{ClientCookieEncoder, Cookie, CookieDecoder, ServerCookieEncoder};
pub use cors::{apply_cors, is_preflight_request, CorsConfig};
pub use error::{HttpWireError, Result};
pub use header_map::HeaderMap;
pub use value_converter::ValueConverter;
