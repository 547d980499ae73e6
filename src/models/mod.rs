mod url;

pub use url::{ShortLink, ShortenRequest, ShortenResponse};
