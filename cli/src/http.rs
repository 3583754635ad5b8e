//! HTTP retrieval of manifest containers.
//!
//! Containers are published at `{base_url}/{channel}/ReleaseInfo.zip`. The
//! source answers 404 as [`RetrievalError::NotFound`] and records the
//! origin's `ETag`, when present, in the retrieval metadata.

use std::io::Read;
use std::time::Duration;

use log::debug;
use release_channel::{ChannelSource, ReleaseChannel, RetrievalError, RetrievalMetadata};

/// File name of the container under each channel directory.
const CONTAINER_FILE: &str = "ReleaseInfo.zip";

/// Largest container body the source will buffer.
const MAX_CONTAINER_BYTES: u64 = 8 * 1024 * 1024;

/// Channel source fetching containers with `ureq`.
///
/// # Examples
///
/// ```
/// use release_channel::ReleaseChannel;
/// use release_channel_cli::http::HttpChannelSource;
/// use std::time::Duration;
///
/// let source = HttpChannelSource::new("https://updates.example.com/", Duration::from_secs(30));
/// assert_eq!(
///     source.channel_url(ReleaseChannel::Canary),
///     "https://updates.example.com/canary/ReleaseInfo.zip"
/// );
/// ```
pub struct HttpChannelSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpChannelSource {
    /// Create a source rooted at `base_url` with a global request timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            base_url: base_url.into(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    /// Construct the container URL for `channel`.
    #[must_use]
    pub fn channel_url(&self, channel: ReleaseChannel) -> String {
        format!(
            "{}/{channel}/{CONTAINER_FILE}",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl ChannelSource for HttpChannelSource {
    fn load_channel_info(
        &self,
        channel: ReleaseChannel,
        dest: &mut Vec<u8>,
    ) -> Result<RetrievalMetadata, RetrievalError> {
        let url = self.channel_url(channel);
        debug!(target: "release_channel_cli::http", "GET {url}");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| map_ureq_error(&url, &e))?;
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        let etag = header("etag");
        let declared = header("content-length").and_then(|value| value.parse::<u64>().ok());
        if declared.is_some_and(|length| length > MAX_CONTAINER_BYTES) {
            return Err(oversized(&url));
        }

        let start = dest.len();
        let mut body = response.into_body();
        let read = body
            .as_reader()
            .take(MAX_CONTAINER_BYTES + 1)
            .read_to_end(dest)?;
        if u64::try_from(read).unwrap_or(u64::MAX) > MAX_CONTAINER_BYTES {
            dest.truncate(start);
            return Err(oversized(&url));
        }

        Ok(etag
            .into_iter()
            .fold(RetrievalMetadata::new(url), RetrievalMetadata::with_etag))
    }
}

/// Error for a response larger than [`MAX_CONTAINER_BYTES`].
fn oversized(url: &str) -> RetrievalError {
    RetrievalError::Http {
        url: url.to_owned(),
        reason: format!("response exceeds {MAX_CONTAINER_BYTES} bytes"),
    }
}

/// Map a ureq error to a [`RetrievalError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> RetrievalError {
    match err {
        ureq::Error::StatusCode(404) => RetrievalError::NotFound {
            url: url.to_owned(),
        },
        other => RetrievalError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    /// Answer one request on a loopback port with `response`, returning the
    /// base URL.
    fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 4096];
                if stream
                    .read(&mut request)
                    .and_then(|_| stream.write_all(&response))
                    .is_err()
                {
                    // Client hung up early.
                }
            }
        });
        format!("http://{addr}")
    }

    fn chunked_response(body: &[u8]) -> Vec<u8> {
        let mut response = format!(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n{:x}\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);
        response.extend_from_slice(b"\r\n0\r\n\r\n");
        response
    }

    fn body_of(len: u64) -> Vec<u8> {
        vec![0u8; usize::try_from(len).expect("length fits in memory")]
    }

    #[test]
    fn small_body_is_loaded_with_etag() {
        let mut response =
            b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nETag: \"v7\"\r\nConnection: close\r\n\r\n"
                .to_vec();
        response.extend_from_slice(b"hello");
        let source = HttpChannelSource::new(serve_once(response), Duration::from_secs(10));

        let mut dest = Vec::new();
        let metadata = source
            .load_channel_info(ReleaseChannel::Production, &mut dest)
            .expect("body loads");
        assert_eq!(dest, b"hello");
        assert_eq!(metadata.etag(), Some("\"v7\""));
        assert!(metadata.source().ends_with("/production/ReleaseInfo.zip"));
    }

    #[test]
    fn oversized_streamed_body_is_an_error() {
        let body = body_of(MAX_CONTAINER_BYTES + 1);
        let source =
            HttpChannelSource::new(serve_once(chunked_response(&body)), Duration::from_secs(30));

        let mut dest = Vec::new();
        let result = source.load_channel_info(ReleaseChannel::Canary, &mut dest);
        assert!(matches!(
            result,
            Err(RetrievalError::Http { ref reason, .. }) if reason.contains("exceeds")
        ));
        assert!(dest.is_empty());
    }

    #[test]
    fn body_at_limit_is_accepted() {
        let body = body_of(MAX_CONTAINER_BYTES);
        let source =
            HttpChannelSource::new(serve_once(chunked_response(&body)), Duration::from_secs(30));

        let mut dest = Vec::new();
        source
            .load_channel_info(ReleaseChannel::Canary, &mut dest)
            .expect("body loads");
        assert_eq!(dest.len(), body.len());
    }

    #[test]
    fn oversized_content_length_is_rejected_up_front() {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            MAX_CONTAINER_BYTES + 1
        )
        .into_bytes();
        let source = HttpChannelSource::new(serve_once(response), Duration::from_secs(10));

        let mut dest = Vec::new();
        let result = source.load_channel_info(ReleaseChannel::Insider, &mut dest);
        assert!(matches!(
            result,
            Err(RetrievalError::Http { ref reason, .. }) if reason.contains("exceeds")
        ));
        assert!(dest.is_empty());
    }

    #[rstest]
    #[case::plain("https://updates.example.test")]
    #[case::trailing_slash("https://updates.example.test/")]
    fn channel_url_joins_base_and_channel(#[case] base: &str) {
        let source = HttpChannelSource::new(base, Duration::from_secs(1));
        assert_eq!(
            source.channel_url(ReleaseChannel::Insider),
            "https://updates.example.test/insider/ReleaseInfo.zip"
        );
    }

    #[test]
    fn map_ureq_error_maps_404_to_not_found() {
        let err = ureq::Error::StatusCode(404);
        let mapped = map_ureq_error("https://example.test/production/ReleaseInfo.zip", &err);
        assert!(matches!(mapped, RetrievalError::NotFound { .. }));
    }

    #[test]
    fn map_ureq_error_maps_other_status_to_http_error() {
        let err = ureq::Error::StatusCode(503);
        let mapped = map_ureq_error("https://example.test/production/ReleaseInfo.zip", &err);
        assert!(matches!(
            mapped,
            RetrievalError::Http { ref url, .. } if url.ends_with("ReleaseInfo.zip")
        ));
    }
}
